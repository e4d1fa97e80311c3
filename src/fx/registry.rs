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
use crate::config::config_file::CurrencyEntry;
use anyhow::{bail, Error};
use std::collections::HashSet;

/// The currency every rate is quoted against.
pub const HOME_CURRENCY: &str = "TWD";

/// A currency the dashboard knows how to display and look up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Currency {
	pub code: String,
	pub display_name: String,

	/// Symbol used against the market-data provider for a TWD-quoted
	/// history, e.g. `USDTWD=X`. The home currency has none.
	pub market_symbol: Option<String>,
}

impl Currency {
	pub fn new(code: &str, display_name: &str, market_symbol: Option<&str>) -> Self {
		Self {
			code: code.to_string(),
			display_name: display_name.to_string(),
			market_symbol: market_symbol.map(|s| s.to_string()),
		}
	}

	pub fn is_home(&self) -> bool {
		self.code == HOME_CURRENCY
	}
}

/// Ordered set of currencies of interest. The home currency is always the
/// first entry, and the order here is the display order of every report.
#[derive(Clone, Debug)]
pub struct Registry {
	currencies: Vec<Currency>,
}

impl Default for Registry {
	fn default() -> Self {
		Self {
			currencies: vec![
				Currency::new(HOME_CURRENCY, "New Taiwan Dollar", None),
				Currency::new("USD", "US Dollar", Some("USDTWD=X")),
				Currency::new("JPY", "Japanese Yen", Some("JPYTWD=X")),
				Currency::new("EUR", "Euro", Some("EURTWD=X")),
				Currency::new("CNY", "Chinese Yuan", Some("CNYTWD=X")),
				Currency::new("HKD", "Hong Kong Dollar", Some("HKDTWD=X")),
				Currency::new("GBP", "British Pound", Some("GBPTWD=X")),
				Currency::new("MYR", "Malaysian Ringgit", Some("MYRTWD=X")),
			],
		}
	}
}

impl Registry {
	/// Builds a registry from configured entries. Codes are upper-cased,
	/// must be unique, and the home currency is injected up front if the
	/// config leaves it out.
	pub fn from_entries(entries: &[CurrencyEntry]) -> Result<Self, Error> {
		let mut seen = HashSet::new();
		let mut currencies = Vec::with_capacity(entries.len() + 1);

		for entry in entries {
			let code = entry.code.trim().to_uppercase();
			if code.is_empty() {
				bail!("currency code cannot be empty");
			}
			if !seen.insert(code.clone()) {
				bail!("currency {} is configured more than once", code);
			}

			let display_name = entry.name.clone().unwrap_or_else(|| code.clone());
			let currency = Currency::new(&code, &display_name, entry.symbol.as_deref());
			if currency.is_home() {
				currencies.insert(0, currency);
			} else {
				currencies.push(currency);
			}
		}

		if !seen.contains(HOME_CURRENCY) {
			currencies.insert(0, Currency::new(HOME_CURRENCY, HOME_CURRENCY, None));
		}

		Ok(Self { currencies })
	}

	pub fn get(&self, code: &str) -> Option<&Currency> {
		self.currencies.iter().find(|c| c.code.eq_ignore_ascii_case(code))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Currency> {
		self.currencies.iter()
	}

	/// Every currency except the home currency, in registry order.
	pub fn foreign(&self) -> impl Iterator<Item = &Currency> {
		self.currencies.iter().filter(|c| !c.is_home())
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.currencies.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(code: &str) -> CurrencyEntry {
		CurrencyEntry {
			code: code.to_string(),
			name: None,
			symbol: None,
		}
	}

	#[test]
	fn test_default_starts_with_home() {
		let registry = Registry::default();
		assert_eq!(registry.iter().next().unwrap().code, HOME_CURRENCY);
		assert!(registry.len() <= 8);
		assert!(registry.foreign().all(|c| c.market_symbol.is_some()));
	}

	#[test]
	fn test_home_injected_first() {
		let registry =
			Registry::from_entries(&[entry("usd"), entry("JPY")]).unwrap();
		let codes: Vec<&str> =
			registry.iter().map(|c| c.code.as_str()).collect();
		assert_eq!(codes, vec!["TWD", "USD", "JPY"]);
	}

	#[test]
	fn test_home_moved_first() {
		let registry =
			Registry::from_entries(&[entry("USD"), entry("TWD")]).unwrap();
		assert!(registry.iter().next().unwrap().is_home());
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn test_duplicate_rejected() {
		assert!(Registry::from_entries(&[entry("USD"), entry("usd")]).is_err());
		assert!(Registry::from_entries(&[entry("  ")]).is_err());
	}

	#[test]
	fn test_lookup_is_case_insensitive() {
		let registry = Registry::default();
		assert_eq!(registry.get("jpy").unwrap().display_name, "Japanese Yen");
		assert!(registry.get("XYZ").is_none());
	}
}
