/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
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
use anyhow::{anyhow, bail, Error};
use chrono::Duration;
use serde::Deserialize;

pub const BANK_OF_TAIWAN_FEED_URL: &str =
	"https://rate.bot.com.tw/xrt/flcsv/0/day";
pub const YAHOO_CHART_URL: &str =
	"https://query1.finance.yahoo.com/v8/finance/chart";
pub const GOOGLE_NEWS_URL: &str = "https://news.google.com/rss/search";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TTL_MINUTES: i64 = 10;
const DEFAULT_NEWS_QUERY: &str = "匯率 進口";
const DEFAULT_NEWS_LIMIT: usize = 10;
const DEFAULT_TICKERS: [&str; 3] = ["2330.TW", "2317.TW", "^TWII"];
const DEFAULT_ANNUAL_TARGET: f64 = 12_000_000.0;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub feed: Option<Feed>,

	/// Currencies of interest, in display order. Falls back to the
	/// built-in registry when absent.
	pub currencies: Option<Vec<CurrencyEntry>>,

	pub market: Option<Market>,
	pub news: Option<News>,
	pub revenue: Option<Revenue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Feed {
	pub url: Option<String>,
	pub timeout_secs: Option<u64>,

	/// How long a fetched rate table is served before refetching
	pub ttl_minutes: Option<i64>,
}

impl Feed {
	pub fn url(&self) -> String {
		self.url
			.clone()
			.unwrap_or_else(|| BANK_OF_TAIWAN_FEED_URL.to_owned())
	}

	pub fn timeout_secs(&self) -> u64 {
		self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
	}

	/// Rejects negative values and anything too large for a `Duration`.
	pub fn ttl(&self) -> Result<Duration, Error> {
		let minutes = self.ttl_minutes.unwrap_or(DEFAULT_TTL_MINUTES);
		if minutes < 0 {
			bail!("feed.ttl_minutes cannot be negative, got {}", minutes);
		}

		Duration::try_minutes(minutes)
			.ok_or_else(|| anyhow!("feed.ttl_minutes is out of range: {}", minutes))
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyEntry {
	pub code: String,
	pub name: Option<String>,

	/// Market-data symbol for the TWD-quoted history, e.g. "USDTWD=X"
	pub symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Market {
	pub chart_url: Option<String>,
	pub tickers: Option<Vec<String>>,
}

impl Market {
	pub fn chart_url(&self) -> String {
		self.chart_url
			.clone()
			.unwrap_or_else(|| YAHOO_CHART_URL.to_owned())
	}

	pub fn tickers(&self) -> Vec<String> {
		self.tickers.clone().unwrap_or_else(|| {
			DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
		})
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct News {
	pub url: Option<String>,
	pub query: Option<String>,
	pub limit: Option<usize>,
}

impl News {
	pub fn url(&self) -> String {
		self.url.clone().unwrap_or_else(|| GOOGLE_NEWS_URL.to_owned())
	}

	pub fn query(&self) -> String {
		self.query
			.clone()
			.unwrap_or_else(|| DEFAULT_NEWS_QUERY.to_owned())
	}

	pub fn limit(&self) -> usize {
		self.limit.unwrap_or(DEFAULT_NEWS_LIMIT)
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct Revenue {
	/// Where the plan is stored. A leading `~/` means the home directory.
	pub file: Option<String>,
	pub annual_target: Option<f64>,
}

impl Revenue {
	pub fn annual_target(&self) -> f64 {
		self.annual_target.unwrap_or(DEFAULT_ANNUAL_TARGET)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = toml::from_str("").unwrap();
		let feed = config.feed.unwrap_or_default();
		assert_eq!(feed.url(), BANK_OF_TAIWAN_FEED_URL);
		assert_eq!(feed.ttl().unwrap(), Duration::minutes(10));
		assert_eq!(config.market.unwrap_or_default().tickers().len(), 3);
		assert!(config.currencies.is_none());
		assert_eq!(config.revenue.unwrap_or_default().annual_target(), 12_000_000.0);
	}

	#[test]
	fn test_full_config() {
		let config: Config = toml::from_str(
			r#"
			[feed]
			timeout_secs = 3
			ttl_minutes = 1

			[[currencies]]
			code = "USD"
			name = "US Dollar"
			symbol = "USDTWD=X"

			[[currencies]]
			code = "JPY"

			[news]
			query = "tariff"
			limit = 5

			[revenue]
			file = "/tmp/plan.csv"
			annual_target = 1200.0
			"#,
		)
		.unwrap();

		assert_eq!(config.feed.as_ref().unwrap().timeout_secs(), 3);
		let currencies = config.currencies.unwrap();
		assert_eq!(currencies.len(), 2);
		assert_eq!(currencies[1].symbol, None);
		assert_eq!(config.news.unwrap_or_default().limit(), 5);
		assert_eq!(config.revenue.unwrap().annual_target, Some(1200.0));
	}

	#[test]
	fn test_ttl_out_of_range() {
		let huge: Config =
			toml::from_str("[feed]\nttl_minutes = 9000000000000000000").unwrap();
		assert!(huge.feed.unwrap().ttl().is_err());

		let negative: Config =
			toml::from_str("[feed]\nttl_minutes = -5").unwrap();
		assert!(negative.feed.unwrap().ttl().is_err());

		let zero: Config = toml::from_str("[feed]\nttl_minutes = 0").unwrap();
		assert_eq!(zero.feed.unwrap().ttl().unwrap(), Duration::zero());
	}
}
