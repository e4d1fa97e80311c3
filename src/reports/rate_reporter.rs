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
use crate::fx::conversion::{CrossRateMatrix, MATRIX_PRECISION};
use crate::fx::exposure::{Exposure, Framing};
use crate::fx::rate_table::RateTable;
use crate::fx::registry::Registry;
use crate::reports::table::Table;
use crate::util::amount::{format_signed, Amount};

/// Decimal places shown for a spot rate
const RATE_PRECISION: usize = 4;

pub struct RateReporter<'a> {
	rates: &'a RateTable,
	registry: &'a Registry,
}

impl<'a> RateReporter<'a> {
	pub fn new(rates: &'a RateTable, registry: &'a Registry) -> Self {
		Self { rates, registry }
	}

	pub fn print_rates(&self) {
		print!("{}", self.render_rates());
	}

	pub fn render_rates(&self) -> String {
		let mut table = Table::new(3);
		table.right_align(vec![2]);
		table.add_header(vec!["Code", "Currency", "Spot sell"]);
		table.add_separator();

		for (code, rate) in self.rates.iter() {
			let name = self
				.registry
				.get(code)
				.map(|c| c.display_name.as_str())
				.unwrap_or(code);
			table.add_row(vec![
				code.to_string(),
				name.to_string(),
				format!("{:.*}", RATE_PRECISION, rate),
			]);
		}

		let mut out = table.render();

		let missing: Vec<&str> = self
			.registry
			.iter()
			.filter(|c| !self.rates.contains(&c.code))
			.map(|c| c.code.as_str())
			.collect();
		if !missing.is_empty() {
			out.push_str(&format!("Unavailable: {}\n", missing.join(", ")));
		}

		out
	}

	pub fn print_matrix(&self, matrix: &CrossRateMatrix) {
		print!("{}", render_matrix(matrix));
	}
}

/// Cell (row, column) reads as "one unit of row buys this much column".
pub fn render_matrix(matrix: &CrossRateMatrix) -> String {
	let columns = matrix.len() + 1;
	let mut table = Table::new(columns);
	table.right_align((1..columns).collect());

	let mut header = vec![""];
	header.extend(matrix.codes().iter().map(|c| c.as_str()));
	table.add_header(header);
	table.add_separator();

	for (code, cells) in matrix.rows() {
		let mut row = vec![code.to_string()];
		row.extend(
			cells
				.iter()
				.map(|v| format!("{:.*}", MATRIX_PRECISION as usize, v)),
		);
		table.add_row(row);
	}

	table.render()
}

pub fn render_conversion(amount: f64, from: &str, to: &str, result: f64) -> String {
	format!("{} = {}\n", Amount::new(amount, from), Amount::new(result, to))
}

pub fn render_exposure(exposure: &Exposure) -> String {
	let heading = match exposure.framing {
		Framing::Import => "Import exposure",
		Framing::Export => "Export exposure",
	};

	let mut table = Table::new(2);
	table.add_row(vec![
		"Notional".to_string(),
		Amount::new(exposure.notional, &exposure.currency).to_string(),
	]);
	table.add_row(vec![
		"Reference rate".to_string(),
		format!("{:.*}", RATE_PRECISION, exposure.reference_rate),
	]);
	table.add_row(vec![
		"Current rate".to_string(),
		format!("{:.*}", RATE_PRECISION, exposure.current_rate),
	]);
	table.add_row(vec![
		"TWD impact".to_string(),
		format!(
			"{} ({}, {})",
			format_signed(exposure.delta, 2),
			exposure.describe(),
			exposure.outlook
		),
	]);

	format!("{}\n{}", heading, table.render())
}
