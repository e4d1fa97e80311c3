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
use crate::fx::registry::HOME_CURRENCY;

/// Spot-sell rates in TWD per one unit of each currency, in display order.
///
/// The home currency is always present at exactly 1.0 and always first.
/// Every other entry is positive and finite; a currency the feed did not
/// deliver is simply absent. Tables are built once per refresh and are not
/// edited afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
	rates: Vec<(String, f64)>,
}

impl Default for RateTable {
	fn default() -> Self {
		Self {
			rates: vec![(HOME_CURRENCY.to_string(), 1.0)],
		}
	}
}

impl RateTable {
	/// Builds a table from (code, rate) pairs. The home currency is added
	/// if missing; supplying it with any rate other than 1.0 is rejected,
	/// as is any non-positive or non-finite rate.
	#[cfg(test)]
	pub fn from_pairs<S: AsRef<str>>(
		pairs: &[(S, f64)],
	) -> Result<Self, RateError> {
		let mut table = RateTable::default();
		for (code, rate) in pairs {
			let code = code.as_ref();
			if code == HOME_CURRENCY {
				if *rate != 1.0 {
					return Err(RateError::NonPositiveRate {
						currency: code.to_string(),
						rate: *rate,
					});
				}
				continue;
			}
			table.insert(code, *rate)?;
		}
		Ok(table)
	}

	/// Inserts or overwrites a rate. Only table builders use this, the
	/// finished table is handed out immutably.
	pub(crate) fn insert(
		&mut self,
		code: &str,
		rate: f64,
	) -> Result<(), RateError> {
		if !rate.is_finite() || rate <= 0.0 {
			return Err(RateError::NonPositiveRate {
				currency: code.to_string(),
				rate,
			});
		}

		match self.rates.iter_mut().find(|(c, _)| c.as_str() == code) {
			Some(existing) => existing.1 = rate,
			None => self.rates.push((code.to_string(), rate)),
		}
		Ok(())
	}

	pub fn get(&self, code: &str) -> Option<f64> {
		self.rates.iter().find(|(c, _)| c == code).map(|(_, r)| *r)
	}

	/// Like `get`, but a missing currency is an error.
	pub fn rate(&self, code: &str) -> Result<f64, RateError> {
		let rate = self
			.get(code)
			.ok_or_else(|| RateError::UnknownCurrency(code.to_string()))?;

		if rate <= 0.0 {
			return Err(RateError::NonPositiveRate {
				currency: code.to_string(),
				rate,
			});
		}
		Ok(rate)
	}

	pub fn contains(&self, code: &str) -> bool {
		self.get(code).is_some()
	}

	#[cfg(test)]
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.rates.iter().map(|(c, _)| c.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.rates.iter().map(|(c, r)| (c.as_str(), *r))
	}

	pub fn len(&self) -> usize {
		self.rates.len()
	}

	/// False when nothing beyond the home currency made it into the table,
	/// which is how an empty or unrecognised feed shows up.
	pub fn has_foreign_rates(&self) -> bool {
		self.rates.len() > 1
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_has_only_home() {
		let table = RateTable::default();
		assert_eq!(table.get(HOME_CURRENCY), Some(1.0));
		assert_eq!(table.len(), 1);
		assert!(!table.has_foreign_rates());
	}

	#[test]
	fn test_from_pairs_keeps_order() {
		let table =
			RateTable::from_pairs(&[("USD", 31.5), ("JPY", 0.205)]).unwrap();
		let codes: Vec<&str> = table.codes().collect();
		assert_eq!(codes, vec!["TWD", "USD", "JPY"]);
	}

	#[test]
	fn test_rejects_bad_rates() {
		assert!(RateTable::from_pairs(&[("USD", 0.0)]).is_err());
		assert!(RateTable::from_pairs(&[("USD", -1.0)]).is_err());
		assert!(RateTable::from_pairs(&[("USD", f64::NAN)]).is_err());
		assert!(RateTable::from_pairs(&[("TWD", 2.0)]).is_err());
		assert!(RateTable::from_pairs(&[("TWD", 1.0)]).is_ok());
	}

	#[test]
	fn test_missing_rate_is_error() {
		let table = RateTable::from_pairs(&[("USD", 31.5)]).unwrap();
		assert_eq!(
			table.rate("EUR"),
			Err(RateError::UnknownCurrency("EUR".to_string()))
		);
		assert_eq!(table.rate("USD"), Ok(31.5));
	}

	#[test]
	fn test_insert_overwrites() {
		let mut table = RateTable::default();
		table.insert("USD", 31.0).unwrap();
		table.insert("USD", 32.0).unwrap();
		assert_eq!(table.get("USD"), Some(32.0));
		assert_eq!(table.len(), 2);
	}
}
