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
use std::fmt;

/// A value with a currency, rendered with thousands separators.
#[derive(Clone, Debug, PartialEq)]
pub struct Amount {
	pub currency: String,
	pub value: f64,

	/// Decimal places to render. Has no effect on the underlying value.
	pub precision: usize,
}

impl Amount {
	pub fn new(value: f64, currency: &str) -> Self {
		Self {
			value,
			currency: currency.to_string(),
			precision: 2,
		}
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {}",
			format_grouped(self.value, self.precision),
			self.currency
		)
	}
}

/// Rounds half away from zero to the given number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
	let factor = 10f64.powi(places as i32);
	(value * factor).round() / factor
}

/// Formats a number with a fixed number of decimals and a comma between
/// each group of three integer digits, e.g. `-1,234,567.89`.
pub fn format_grouped(value: f64, precision: usize) -> String {
	if !value.is_finite() {
		return value.to_string();
	}

	let rendered = format!("{:.*}", precision, value.abs());
	let (whole, fraction) = match rendered.split_once('.') {
		Some((w, f)) => (w, Some(f)),
		None => (rendered.as_str(), None),
	};

	let mut grouped = String::with_capacity(rendered.len() + whole.len() / 3);
	for (i, digit) in whole.chars().enumerate() {
		if i > 0 && (whole.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	if let Some(fraction) = fraction {
		grouped.push('.');
		grouped.push_str(fraction);
	}

	// "-0.00" reads oddly; only mark values that survive rounding
	let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
	if value.is_sign_negative() && !is_zero {
		grouped.insert(0, '-');
	}

	grouped
}

/// Formats a ratio as a percentage with one decimal place, e.g. `42.5%`.
pub fn format_percent(ratio: f64) -> String {
	format!("{:.1}%", ratio * 100.0)
}

/// Like `format_grouped`, but always carries a sign.
pub fn format_signed(value: f64, precision: usize) -> String {
	let out = format_grouped(value, precision);
	if out.starts_with('-') || out.chars().all(|c| c == '0' || c == '.') {
		out
	} else {
		format!("+{}", out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_to() {
		assert_eq!(round_to(31.5 / 0.205, 4), 153.6585);
		assert_eq!(round_to(1.0, 4), 1.0);
		assert_eq!(round_to(-2.345_67, 2), -2.35);
	}

	#[test]
	fn test_format_grouped() {
		assert_eq!(format_grouped(0.0, 2), "0.00");
		assert_eq!(format_grouped(999.0, 0), "999");
		assert_eq!(format_grouped(1000.0, 0), "1,000");
		assert_eq!(format_grouped(1_234_567.891, 2), "1,234,567.89");
		assert_eq!(format_grouped(-3150.0, 2), "-3,150.00");
		assert_eq!(format_grouped(-0.001, 2), "0.00");
	}

	#[test]
	fn test_format_signed() {
		assert_eq!(format_signed(150_000.0, 2), "+150,000.00");
		assert_eq!(format_signed(-5_000.0, 0), "-5,000");
		assert_eq!(format_signed(0.0, 2), "0.00");
	}

	#[test]
	fn test_amount_display() {
		assert_eq!(Amount::new(3150.0, "TWD").to_string(), "3,150.00 TWD");
		assert_eq!(
			Amount {
				precision: 0,
				..Amount::new(-12.4, "USD")
			}
			.to_string(),
			"-12 USD"
		);
		assert_eq!(format_percent(0.425), "42.5%");
	}
}
