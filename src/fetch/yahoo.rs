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
use crate::fetch::http::Client;
use crate::fetch::models::{ChartHolder, ChartParams, ChartResult};
use anyhow::{anyhow, bail, Error};
use chrono::{DateTime, NaiveDate};
use clap::ValueEnum;

/// Range of daily history to request.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
	#[default]
	#[value(name = "1mo")]
	OneMonth,
	#[value(name = "3mo")]
	ThreeMonths,
	#[value(name = "6mo")]
	SixMonths,
	#[value(name = "1y")]
	OneYear,
}

impl Period {
	pub fn as_range(&self) -> &'static str {
		match self {
			Period::OneMonth => "1mo",
			Period::ThreeMonths => "3mo",
			Period::SixMonths => "6mo",
			Period::OneYear => "1y",
		}
	}
}

const DAILY: &str = "1d";

/// Quotes only need the last couple of sessions
const QUOTE_RANGE: &str = "5d";

#[derive(Clone, Debug, PartialEq)]
pub struct PricePoint {
	pub date: NaiveDate,
	pub close: f64,
}

/// Daily closes for one symbol, oldest first.
#[derive(Clone, Debug)]
pub struct PriceHistory {
	pub symbol: String,
	pub currency: Option<String>,
	pub points: Vec<PricePoint>,
}

impl PriceHistory {
	pub fn first(&self) -> Option<&PricePoint> {
		self.points.first()
	}

	pub fn last(&self) -> Option<&PricePoint> {
		self.points.last()
	}

	pub fn low(&self) -> Option<f64> {
		self.points.iter().map(|p| p.close).reduce(f64::min)
	}

	pub fn high(&self) -> Option<f64> {
		self.points.iter().map(|p| p.close).reduce(f64::max)
	}

	/// Absolute change from the first to the last close.
	pub fn change(&self) -> Option<f64> {
		Some(self.last()?.close - self.first()?.close)
	}

	/// Change from the first to the last close as a ratio of the first.
	pub fn change_ratio(&self) -> Option<f64> {
		let first = self.first()?.close;
		if first == 0.0 {
			return None;
		}
		Some(self.change()? / first)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
	pub symbol: String,
	pub name: Option<String>,
	pub price: f64,
	pub previous_close: Option<f64>,
}

impl Quote {
	pub fn change(&self) -> Option<f64> {
		self.previous_close.map(|p| self.price - p)
	}

	pub fn change_ratio(&self) -> Option<f64> {
		match self.previous_close {
			Some(p) if p != 0.0 => Some((self.price - p) / p),
			_ => None,
		}
	}
}

/// Client for the Yahoo Finance chart endpoint.
pub struct Yahoo<'a> {
	http: &'a Client,
	chart_url: String,
}

impl<'a> Yahoo<'a> {
	pub fn new(http: &'a Client, chart_url: &str) -> Self {
		Self {
			http,
			chart_url: chart_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn history(
		&self,
		symbol: &str,
		period: Period,
	) -> Result<PriceHistory, Error> {
		let holder = self.chart(symbol, period.as_range())?;
		history_from_chart(holder)
	}

	pub fn quote(&self, symbol: &str) -> Result<Quote, Error> {
		let holder = self.chart(symbol, QUOTE_RANGE)?;
		quote_from_chart(holder)
	}

	fn chart(&self, symbol: &str, range: &'static str) -> Result<ChartHolder, Error> {
		let url = format!("{}/{}", self.chart_url, symbol);
		self.http.get_json(
			&url,
			Some(ChartParams {
				range,
				interval: DAILY,
			}),
		)
	}
}

fn single_result(holder: ChartHolder) -> Result<ChartResult, Error> {
	if let Some(error) = holder.chart.error {
		bail!(
			"chart error {}: {}",
			error.code,
			error.description.unwrap_or_default()
		);
	}

	holder
		.chart
		.result
		.and_then(|r| r.into_iter().next())
		.ok_or_else(|| anyhow!("chart response has no result"))
}

pub fn history_from_chart(holder: ChartHolder) -> Result<PriceHistory, Error> {
	let result = single_result(holder)?;
	let offset = result.meta.gmtoffset.unwrap_or(0);

	let closes = result
		.indicators
		.quote
		.into_iter()
		.next()
		.map(|q| q.close)
		.unwrap_or_default();

	// Bars with a null close (holidays, halted sessions) are dropped
	let points = result
		.timestamp
		.iter()
		.zip(closes)
		.filter_map(|(ts, close)| {
			let close = close.filter(|c| c.is_finite())?;
			let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
			Some(PricePoint { date, close })
		})
		.collect();

	Ok(PriceHistory {
		symbol: result.meta.symbol,
		currency: result.meta.currency,
		points,
	})
}

pub fn quote_from_chart(holder: ChartHolder) -> Result<Quote, Error> {
	let result = single_result(holder)?;
	let meta = result.meta;

	let price = meta
		.regular_market_price
		.ok_or_else(|| anyhow!("no market price for {}", meta.symbol))?;

	Ok(Quote {
		symbol: meta.symbol,
		name: meta.short_name,
		price,
		previous_close: meta.chart_previous_close,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	const CHART: &str = r#"{
		"chart": {
			"result": [{
				"meta": {
					"symbol": "USDTWD=X",
					"currency": "TWD",
					"shortName": "USD/TWD",
					"regularMarketPrice": 32.4,
					"chartPreviousClose": 32.0,
					"gmtoffset": 3600
				},
				"timestamp": [1735689600, 1735776000, 1735862400],
				"indicators": {
					"quote": [{ "close": [32.0, null, 32.4] }]
				}
			}],
			"error": null
		}
	}"#;

	const NOT_FOUND: &str = r#"{
		"chart": {
			"result": null,
			"error": { "code": "Not Found", "description": "No data found" }
		}
	}"#;

	fn holder(json: &str) -> ChartHolder {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn test_history_skips_null_closes() {
		let history = history_from_chart(holder(CHART)).unwrap();
		assert_eq!(history.symbol, "USDTWD=X");
		assert_eq!(history.points.len(), 2);
		assert_eq!(
			history.first().unwrap().date,
			NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
		);
		assert_eq!(
			history.last().unwrap().date,
			NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
		);
		assert_eq!(history.low(), Some(32.0));
		assert_eq!(history.high(), Some(32.4));
		assert_relative_eq!(history.change_ratio().unwrap(), 0.0125, max_relative = 1e-9);
	}

	#[test]
	fn test_quote() {
		let quote = quote_from_chart(holder(CHART)).unwrap();
		assert_eq!(quote.price, 32.4);
		assert_relative_eq!(quote.change().unwrap(), 0.4, max_relative = 1e-9);
		assert_eq!(quote.name.as_deref(), Some("USD/TWD"));
	}

	#[test]
	fn test_chart_error() {
		let err = history_from_chart(holder(NOT_FOUND)).unwrap_err();
		assert!(err.to_string().contains("Not Found"));
		assert!(quote_from_chart(holder(NOT_FOUND)).is_err());
	}

	#[test]
	fn test_empty_history() {
		let history = PriceHistory {
			symbol: "X".to_string(),
			currency: None,
			points: vec![],
		};
		assert_eq!(history.change(), None);
		assert_eq!(history.low(), None);
	}

	#[test]
	fn test_period_ranges() {
		assert_eq!(Period::default().as_range(), "1mo");
		assert_eq!(Period::OneYear.as_range(), "1y");
	}
}
