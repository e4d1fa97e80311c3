/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::fx::error::RateError;
use crate::fx::rate_table::RateTable;
use std::fmt;

/// Which side of the trade the notional sits on. Decides whether a rising
/// rate is good or bad news; the arithmetic is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
	/// Paying foreign currency for goods; a higher rate costs more TWD.
	Import,
	/// Receiving foreign currency for goods; a higher rate earns more TWD.
	Export,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outlook {
	Favorable,
	Unfavorable,
	Neutral,
}

impl fmt::Display for Outlook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Outlook::Favorable => write!(f, "favorable"),
			Outlook::Unfavorable => write!(f, "unfavorable"),
			Outlook::Neutral => write!(f, "neutral"),
		}
	}
}

/// Result of measuring how far the current rate has drifted from the rate
/// a deal was planned at, in TWD.
#[derive(Clone, Debug, PartialEq)]
pub struct Exposure {
	pub framing: Framing,
	pub currency: String,
	pub notional: f64,
	pub reference_rate: f64,
	pub current_rate: f64,

	/// `notional * (current_rate - reference_rate)`, never sign-flipped.
	pub delta: f64,

	pub outlook: Outlook,
}

impl Exposure {
	/// Short human wording of the delta for the given framing.
	pub fn describe(&self) -> &'static str {
		match (self.framing, self.outlook) {
			(_, Outlook::Neutral) => "no change",
			(Framing::Import, Outlook::Unfavorable) => "cost increase",
			(Framing::Import, Outlook::Favorable) => "cost saving",
			(Framing::Export, Outlook::Favorable) => "revenue gain",
			(Framing::Export, Outlook::Unfavorable) => "revenue shrinkage",
		}
	}
}

/// TWD impact of rate drift on a foreign-currency payable.
pub fn import_impact(
	notional: f64,
	currency: &str,
	reference_rate: f64,
	table: &RateTable,
) -> Result<Exposure, RateError> {
	measure(Framing::Import, notional, currency, reference_rate, table)
}

/// TWD impact of rate drift on a foreign-currency receivable.
pub fn export_impact(
	notional: f64,
	currency: &str,
	reference_rate: f64,
	table: &RateTable,
) -> Result<Exposure, RateError> {
	measure(Framing::Export, notional, currency, reference_rate, table)
}

fn measure(
	framing: Framing,
	notional: f64,
	currency: &str,
	reference_rate: f64,
	table: &RateTable,
) -> Result<Exposure, RateError> {
	if !notional.is_finite() {
		return Err(RateError::InvalidAmount(notional));
	}
	if !reference_rate.is_finite() || reference_rate <= 0.0 {
		return Err(RateError::NonPositiveRate {
			currency: currency.to_string(),
			rate: reference_rate,
		});
	}

	let current_rate = table.rate(currency)?;
	let delta = notional * (current_rate - reference_rate);

	Ok(Exposure {
		framing,
		currency: currency.to_string(),
		notional,
		reference_rate,
		current_rate,
		delta,
		outlook: classify(framing, delta),
	})
}

fn classify(framing: Framing, delta: f64) -> Outlook {
	if delta == 0.0 {
		return Outlook::Neutral;
	}

	let rising = delta > 0.0;
	match framing {
		Framing::Import if rising => Outlook::Unfavorable,
		Framing::Import => Outlook::Favorable,
		Framing::Export if rising => Outlook::Favorable,
		Framing::Export => Outlook::Unfavorable,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;

	fn table() -> RateTable {
		RateTable::from_pairs(&[("USD", 31.5), ("MYR", 7.25)]).unwrap()
	}

	#[test]
	fn test_import_cost_increase() {
		let e = import_impact(1_000_000.0, "MYR", 7.10, &table()).unwrap();
		assert_abs_diff_eq!(e.delta, 150_000.0, epsilon = 1e-6);
		assert_eq!(e.outlook, Outlook::Unfavorable);
		assert_eq!(e.describe(), "cost increase");
		assert_eq!(e.current_rate, 7.25);
	}

	#[test]
	fn test_import_and_export_share_delta() {
		for reference in [30.0, 31.5, 33.0] {
			let i = import_impact(50_000.0, "USD", reference, &table()).unwrap();
			let e = export_impact(50_000.0, "USD", reference, &table()).unwrap();
			assert_eq!(i.delta, e.delta);

			match i.outlook {
				Outlook::Neutral => assert_eq!(e.outlook, Outlook::Neutral),
				Outlook::Favorable => {
					assert_eq!(e.outlook, Outlook::Unfavorable)
				},
				Outlook::Unfavorable => {
					assert_eq!(e.outlook, Outlook::Favorable)
				},
			}
		}
	}

	#[test]
	fn test_export_shrinkage() {
		let e = export_impact(10_000.0, "USD", 32.0, &table()).unwrap();
		assert_abs_diff_eq!(e.delta, -5_000.0, epsilon = 1e-9);
		assert_eq!(e.outlook, Outlook::Unfavorable);
		assert_eq!(e.describe(), "revenue shrinkage");
	}

	#[test]
	fn test_neutral_when_unchanged() {
		let e = import_impact(10_000.0, "USD", 31.5, &table()).unwrap();
		assert_eq!(e.delta, 0.0);
		assert_eq!(e.outlook, Outlook::Neutral);
	}

	#[test]
	fn test_rejects_bad_input() {
		assert_eq!(
			import_impact(1.0, "JPY", 0.2, &table()).unwrap_err(),
			RateError::UnknownCurrency("JPY".to_string())
		);
		assert!(import_impact(1.0, "USD", 0.0, &table()).is_err());
		assert!(export_impact(1.0, "USD", -2.0, &table()).is_err());
		assert!(export_impact(f64::NAN, "USD", 31.0, &table()).is_err());
	}
}
