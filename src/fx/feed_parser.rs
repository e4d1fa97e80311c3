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
use crate::fx::rate_table::RateTable;
use crate::fx::registry::Registry;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;

/// Column holding the currency code, e.g. `USD` or `USD 美金`.
const CODE_COLUMN: usize = 0;

/// Column holding the spot-sell rate in the Bank of Taiwan daily CSV.
const SPOT_SELL_COLUMN: usize = 12;

/// Rows shorter than this cannot carry a spot-sell rate.
const MIN_COLUMNS: usize = SPOT_SELL_COLUMN + 1;

/// Parses the Bank of Taiwan daily rate CSV into a table holding the
/// registry's currencies, in registry order.
///
/// Short rows and rows that fail to decode are skipped. A row whose
/// spot-sell value does not parse to a positive number contributes nothing,
/// so a currency without a usable row is left out of the table entirely.
/// When several usable rows match one currency the last one wins.
pub fn parse_feed(text: &str, registry: &Registry) -> RateTable {
	let text = text.trim_start_matches('\u{feff}');

	let mut reader = ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.trim(Trim::All)
		.from_reader(text.as_bytes());

	let mut found: HashMap<&str, f64> = HashMap::new();

	for record in reader.records() {
		let record = match record {
			Ok(r) => r,
			Err(e) => {
				log::debug!("skipping undecodable feed row: {}", e);
				continue;
			},
		};

		if record.len() < MIN_COLUMNS {
			continue;
		}

		let code_field = normalize_whitespace(&record[CODE_COLUMN]);
		let value = &record[SPOT_SELL_COLUMN];

		for currency in registry.foreign() {
			if !code_field.contains(currency.code.as_str()) {
				continue;
			}

			match parse_rate(value) {
				Some(rate) => {
					found.insert(currency.code.as_str(), rate);
				},
				None => log::debug!(
					"no usable spot-sell rate for {}: {:?}",
					currency.code,
					value
				),
			}
		}
	}

	let mut table = RateTable::default();
	for currency in registry.foreign() {
		if let Some(&rate) = found.get(currency.code.as_str()) {
			if let Err(e) = table.insert(&currency.code, rate) {
				log::warn!("dropping {} from rate table: {}", currency.code, e);
			}
		}
	}

	table
}

fn parse_rate(value: &str) -> Option<f64> {
	value
		.trim()
		.parse::<f64>()
		.ok()
		.filter(|r| r.is_finite() && *r > 0.0)
}

fn normalize_whitespace(s: &str) -> String {
	s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	const HEADER: &str = "幣別,匯率,現金,即期,遠期10天,遠期30天,遠期60天,遠期90天,遠期120天,遠期150天,遠期180天,匯率,現金,即期,遠期10天,遠期30天,遠期60天,遠期90天,遠期120天,遠期150天,遠期180天";

	fn row(code: &str, spot_sell: &str) -> String {
		format!(
			"{},本行買入,31.1,31.4,31.3,31.2,31.1,31.0,30.9,30.8,30.7,本行賣出,{},31.6,31.5,31.4,31.3,31.2,31.1,31.0,30.9",
			code, spot_sell
		)
	}

	#[test]
	fn test_parses_known_currencies() {
		let text = format!(
			"\u{feff}{}\n{}\n{}\n",
			HEADER,
			row("USD", "31.5"),
			row("JPY", "0.2050")
		);
		let table = parse_feed(&text, &Registry::default());

		assert_eq!(table.get("TWD"), Some(1.0));
		assert_eq!(table.get("USD"), Some(31.5));
		assert_eq!(table.get("JPY"), Some(0.205));
		assert!(!table.contains("EUR"));
	}

	#[test]
	fn test_order_follows_registry() {
		let text = format!("{}\n{}\n", row("JPY", "0.205"), row("USD", "31.5"));
		let table = parse_feed(&text, &Registry::default());
		let codes: Vec<&str> = table.codes().collect();
		assert_eq!(codes, vec!["TWD", "USD", "JPY"]);
	}

	#[test]
	fn test_short_row_is_ignored() {
		let text = format!("{}\nEUR,1,2,3\n", row("USD", "31.5"));
		let table = parse_feed(&text, &Registry::default());
		assert_eq!(table.len(), 2);
		assert!(!table.contains("EUR"));
		assert_eq!(table.get("USD"), Some(31.5));
	}

	#[test]
	fn test_non_numeric_value_is_omitted() {
		let text = format!("{}\n{}\n", row("USD", "-"), row("JPY", "abc"));
		let table = parse_feed(&text, &Registry::default());
		assert!(!table.contains("USD"));
		assert!(!table.contains("JPY"));
		assert!(!table.has_foreign_rates());
	}

	#[test]
	fn test_bad_later_row_keeps_earlier_rate() {
		let text = format!("{}\n{}\n", row("USD", "31.5"), row("USD", "n/a"));
		let table = parse_feed(&text, &Registry::default());
		assert_eq!(table.get("USD"), Some(31.5));
	}

	#[test]
	fn test_zero_value_is_omitted() {
		let table =
			parse_feed(&row("USD", "0.00000"), &Registry::default());
		assert!(!table.contains("USD"));
	}

	#[test]
	fn test_code_substring_and_whitespace() {
		let text = row("  USD   美金 ", "31.5");
		let table = parse_feed(&text, &Registry::default());
		assert_eq!(table.get("USD"), Some(31.5));
	}

	#[test]
	fn test_empty_feed_has_home_only() {
		let table = parse_feed("", &Registry::default());
		assert_eq!(table, RateTable::default());
	}
}
