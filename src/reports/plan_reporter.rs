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
use crate::fx::registry::HOME_CURRENCY;
use crate::reports::table::Table;
use crate::revenue::plan::RevenuePlan;
use crate::util::amount::{format_grouped, format_percent};
use chrono::NaiveDate;

pub struct PlanReporter<'a> {
	plan: &'a RevenuePlan,
}

impl<'a> PlanReporter<'a> {
	pub fn new(plan: &'a RevenuePlan) -> Self {
		Self { plan }
	}

	pub fn print(&self, as_of: NaiveDate) {
		print!("{}", self.render(as_of));
	}

	pub fn render(&self, as_of: NaiveDate) -> String {
		let mut table = Table::new(4);
		table.right_align(vec![1, 2, 3]);
		table.add_header(vec!["Month", "Target", "Actual", "Achieved"]);
		table.add_separator();

		for record in self.plan.months() {
			table.add_row(vec![
				record.month.clone(),
				format_grouped(record.target, 2),
				format_grouped(record.actual, 2),
				ratio(record.actual, record.target),
			]);
		}

		table.add_partial_separator(vec![1, 2, 3]);
		table.add_row(vec![
			"Total".to_string(),
			format_grouped(self.plan.total_target(), 2),
			format_grouped(self.plan.total_actual(), 2),
			format_percent(self.plan.achievement()),
		]);

		let progress = self.plan.progress(as_of);
		format!(
			"Revenue plan ({})\n{}As of {}: {} achieved, {} of the year elapsed ({})\n",
			HOME_CURRENCY,
			table.render(),
			as_of,
			format_percent(progress.achieved),
			format_percent(progress.elapsed),
			progress.standing
		)
	}
}

/// Blank rather than a division by zero for months without a target.
fn ratio(actual: f64, target: f64) -> String {
	if target == 0.0 {
		return String::new();
	}
	format_percent(actual / target)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::date::parse_date;

	#[test]
	fn test_render() {
		let mut plan = RevenuePlan::new(1200.0);
		plan.set_actual("Jan", 90.0).unwrap();
		plan.set_actual("Feb", 120.0).unwrap();
		plan.set_target("Dec", 0.0).unwrap();

		let out = PlanReporter::new(&plan).render(parse_date("2025-03-01").unwrap());
		let lines: Vec<&str> = out.lines().collect();

		assert_eq!(lines[0], "Revenue plan (TWD)");
		assert_eq!(lines[1], "Month |  Target  | Actual | Achieved");
		assert_eq!(lines[3], "Jan       100.00    90.00      90.0%");
		assert_eq!(lines[4], "Feb       100.00   120.00     120.0%");
		assert_eq!(lines[14], "Dec         0.00     0.00");
		assert_eq!(lines[15], "        --------   ------   --------");
		assert_eq!(lines[16], "Total   1,100.00   210.00      19.1%");
		assert_eq!(
			lines[17],
			"As of 2025-03-01: 19.1% achieved, 16.4% of the year elapsed (ahead)"
		);
	}
}
