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
use crate::fetch::news::NewsItem;
use crate::fetch::yahoo::{Period, PriceHistory, Quote};
use crate::reports::table::Table;
use crate::util::amount::{format_grouped, format_signed};
use crate::util::date::to_minute;
use anyhow::Error;

/// Closes listed under the history summary, newest first
const RECENT_POINTS: usize = 5;

const PRICE_PRECISION: usize = 4;

pub fn render_history(history: &PriceHistory, period: Period) -> String {
	let mut out = match &history.currency {
		Some(currency) => {
			format!("{} ({}, {})\n", history.symbol, period.as_range(), currency)
		},
		None => format!("{} ({})\n", history.symbol, period.as_range()),
	};

	let (Some(first), Some(last)) = (history.first(), history.last()) else {
		out.push_str("No closes in range\n");
		return out;
	};

	let mut summary = Table::new(3);
	summary.right_align(vec![2]);
	summary.add_row(vec![
		"Open".to_string(),
		first.date.to_string(),
		price(first.close),
	]);
	summary.add_row(vec![
		"Close".to_string(),
		last.date.to_string(),
		price(last.close),
	]);
	if let (Some(low), Some(high)) = (history.low(), history.high()) {
		summary.add_row(vec!["Low".to_string(), String::new(), price(low)]);
		summary.add_row(vec!["High".to_string(), String::new(), price(high)]);
	}
	if let Some(change) = history.change() {
		summary.add_row(vec![
			"Change".to_string(),
			history.change_ratio().map(signed_percent).unwrap_or_default(),
			format_signed(change, PRICE_PRECISION),
		]);
	}
	out.push_str(&summary.render());
	out.push('\n');

	let mut recent = Table::new(2);
	recent.right_align(vec![1]);
	recent.add_header(vec!["Date", "Close"]);
	recent.add_separator();
	for point in history.points.iter().rev().take(RECENT_POINTS) {
		recent.add_row(vec![point.date.to_string(), price(point.close)]);
	}
	out.push_str(&recent.render());

	out
}

/// One row per requested symbol; a failed lookup keeps its row so the
/// order of the watch list is stable.
pub fn render_quotes(quotes: &[(String, Result<Quote, Error>)]) -> String {
	let mut table = Table::new(4);
	table.right_align(vec![2, 3]);
	table.add_header(vec!["Symbol", "Name", "Price", "Change"]);
	table.add_separator();

	for (symbol, quote) in quotes {
		match quote {
			Ok(q) => {
				let change = match (q.change(), q.change_ratio()) {
					(Some(c), Some(r)) => format!(
						"{} ({})",
						format_signed(c, 2),
						signed_percent(r)
					),
					(Some(c), None) => format_signed(c, 2),
					_ => String::new(),
				};
				table.add_row(vec![
					q.symbol.clone(),
					q.name.clone().unwrap_or_default(),
					format_grouped(q.price, 2),
					change,
				]);
			},
			Err(e) => {
				log::warn!("quote for {} unavailable: {}", symbol, e);
				table.add_row(vec![
					symbol.clone(),
					"unavailable".to_string(),
					String::new(),
					String::new(),
				]);
			},
		}
	}

	table.render()
}

pub fn render_news(items: &[NewsItem]) -> String {
	if items.is_empty() {
		return "No headlines\n".to_string();
	}

	let mut out = String::new();
	for item in items {
		let when = item
			.published
			.as_ref()
			.map(to_minute)
			.unwrap_or_else(|| "----------------".to_string());
		out.push_str(&format!("{}  {}", when, item.title));
		if let Some(source) = &item.source {
			if !item.title.ends_with(source.as_str()) {
				out.push_str(&format!(" ({})", source));
			}
		}
		out.push('\n');
		if !item.link.is_empty() {
			out.push_str(&format!("                  {}\n", item.link));
		}
	}
	out
}

fn price(value: f64) -> String {
	format_grouped(value, PRICE_PRECISION)
}

fn signed_percent(ratio: f64) -> String {
	format!("{}%", format_signed(ratio * 100.0, 2))
}
