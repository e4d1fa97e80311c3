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
use serde::{Deserialize, Serialize};

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct ChartParams {
	pub range: &'static str,
	pub interval: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NewsParams<'a> {
	pub q: &'a str,
	pub hl: &'static str,
	pub gl: &'static str,
	pub ceid: &'static str,
}

// ---------------
// -- RECEIVING --
// ---------------

#[derive(Deserialize, Debug)]
pub struct ChartHolder {
	pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
	pub result: Option<Vec<ChartResult>>,
	pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
	pub code: String,
	pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
	pub meta: ChartMeta,

	/// Absent when the symbol has no bars in the requested range
	#[serde(default)]
	pub timestamp: Vec<i64>,

	pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
	pub symbol: String,
	pub currency: Option<String>,
	pub short_name: Option<String>,
	pub regular_market_price: Option<f64>,
	pub chart_previous_close: Option<f64>,

	/// Seconds east of UTC for the exchange; bars are stamped at the
	/// exchange's local session time.
	pub gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
	#[serde(default)]
	pub quote: Vec<QuoteIndicator>,
}

#[derive(Deserialize, Debug)]
pub struct QuoteIndicator {
	/// Aligned with `ChartResult::timestamp`; null for missing bars
	#[serde(default)]
	pub close: Vec<Option<f64>>,
}
