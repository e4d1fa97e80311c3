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
use crate::util::amount::round_to;

/// Decimal places kept in each cross-rate cell.
pub const MATRIX_PRECISION: u32 = 4;

/// Converts `amount` of `from` into `to` through their TWD rates.
pub fn convert(
	amount: f64,
	from: &str,
	to: &str,
	table: &RateTable,
) -> Result<f64, RateError> {
	if !amount.is_finite() {
		return Err(RateError::InvalidAmount(amount));
	}

	let from_rate = table.rate(from)?;
	let to_rate = table.rate(to)?;

	if from == to {
		return Ok(amount);
	}

	Ok(amount * from_rate / to_rate)
}

/// Every pairwise rate of a table: cell (i, j) is how many units of
/// currency j one unit of currency i buys.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossRateMatrix {
	codes: Vec<String>,
	cells: Vec<Vec<f64>>,
}

impl CrossRateMatrix {
	pub fn from_table(table: &RateTable) -> Self {
		let rates: Vec<(&str, f64)> = table.iter().collect();

		let cells = rates
			.iter()
			.map(|(_, row_rate)| {
				rates
					.iter()
					.map(|(_, col_rate)| {
						round_to(row_rate / col_rate, MATRIX_PRECISION)
					})
					.collect()
			})
			.collect();

		Self {
			codes: rates.iter().map(|(c, _)| c.to_string()).collect(),
			cells,
		}
	}

	pub fn codes(&self) -> &[String] {
		&self.codes
	}

	pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
		self.codes
			.iter()
			.map(|c| c.as_str())
			.zip(self.cells.iter().map(|r| r.as_slice()))
	}

	#[cfg(test)]
	pub fn get(&self, row: &str, col: &str) -> Option<f64> {
		let i = self.codes.iter().position(|c| c == row)?;
		let j = self.codes.iter().position(|c| c == col)?;
		Some(self.cells[i][j])
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}
}

pub fn cross_rate_matrix(table: &RateTable) -> CrossRateMatrix {
	CrossRateMatrix::from_table(table)
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn table() -> RateTable {
		RateTable::from_pairs(&[
			("USD", 31.5),
			("JPY", 0.205),
			("EUR", 34.12),
			("MYR", 7.25),
		])
		.unwrap()
	}

	#[test]
	fn test_convert_to_home() {
		let t = RateTable::from_pairs(&[("USD", 31.5)]).unwrap();
		assert_eq!(convert(100.0, "USD", "TWD", &t).unwrap(), 3150.0);
	}

	#[test]
	fn test_convert_from_home() {
		let t = table();
		assert_relative_eq!(
			convert(3150.0, "TWD", "USD", &t).unwrap(),
			100.0,
			max_relative = 1e-12
		);
	}

	#[test]
	fn test_identity_is_exact() {
		let t = table();
		for amount in [0.0, 1.0, 123.456, 1e9, -7.3] {
			for code in t.codes() {
				assert_eq!(convert(amount, code, code, &t).unwrap(), amount);
			}
		}
	}

	#[test]
	fn test_transitivity() {
		let t = table();
		let codes: Vec<&str> = t.codes().collect();
		for a in &codes {
			for b in &codes {
				for c in &codes {
					let via = convert(1.0, a, b, &t).unwrap()
						* convert(1.0, b, c, &t).unwrap();
					let direct = convert(1.0, a, c, &t).unwrap();
					assert_relative_eq!(via, direct, max_relative = 1e-12);
				}
			}
		}
	}

	#[test]
	fn test_unknown_currency_fails() {
		let t = table();
		assert_eq!(
			convert(1.0, "USD", "KRW", &t),
			Err(RateError::UnknownCurrency("KRW".to_string()))
		);
		assert_eq!(
			convert(1.0, "KRW", "KRW", &t),
			Err(RateError::UnknownCurrency("KRW".to_string()))
		);
	}

	#[test]
	fn test_non_finite_amount_fails() {
		assert!(convert(f64::NAN, "USD", "TWD", &table()).is_err());
		assert!(convert(f64::INFINITY, "USD", "TWD", &table()).is_err());
	}

	#[test]
	fn test_matrix_diagonal() {
		let m = cross_rate_matrix(&table());
		for code in m.codes() {
			assert_eq!(m.get(code, code), Some(1.0));
		}
		assert_eq!(m.len(), 5);
	}

	#[test]
	fn test_matrix_cell() {
		let t = RateTable::from_pairs(&[("USD", 31.5), ("JPY", 0.205)])
			.unwrap();
		let m = cross_rate_matrix(&t);
		assert_eq!(m.get("USD", "JPY"), Some(153.6585));
		assert_eq!(m.get("USD", "TWD"), Some(31.5));
		assert_eq!(m.get("TWD", "JPY"), Some(4.878));
		assert_eq!(m.get("USD", "EUR"), None);
	}

	#[test]
	fn test_matrix_order_follows_table() {
		let m = cross_rate_matrix(&table());
		let rows: Vec<&str> = m.rows().map(|(c, _)| c).collect();
		assert_eq!(rows, vec!["TWD", "USD", "JPY", "EUR", "MYR"]);
		assert!(m.rows().all(|(_, cells)| cells.len() == 5));
	}
}
