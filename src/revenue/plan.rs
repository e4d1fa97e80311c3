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
use crate::util::date::{year_elapsed, MONTH_LABELS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Achievement within this distance of elapsed time counts as on track.
const ON_TRACK_TOLERANCE: f64 = 0.01;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
	#[error("unknown month: {0} (use Jan..Dec or 1..12)")]
	UnknownMonth(String),

	#[error("amount must be a finite, non-negative number, got {0}")]
	InvalidAmount(f64),

	#[error("malformed plan: {0}")]
	Malformed(String),
}

/// One row of the plan, and one row of the stored file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
	pub month: String,
	pub target: f64,
	pub actual: f64,
}

/// Monthly revenue targets and actuals for one calendar year. Always holds
/// exactly twelve records, January first.
#[derive(Clone, Debug, PartialEq)]
pub struct RevenuePlan {
	months: Vec<MonthRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Standing {
	Ahead,
	OnTrack,
	Behind,
}

impl fmt::Display for Standing {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Standing::Ahead => "ahead",
			Standing::OnTrack => "on track",
			Standing::Behind => "behind",
		};
		write!(f, "{}", s)
	}
}

/// Year-to-date achievement compared with how much of the year is gone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
	pub achieved: f64,
	pub elapsed: f64,
	pub standing: Standing,
}

impl RevenuePlan {
	/// A fresh plan with the annual target spread evenly and no actuals.
	pub fn new(annual_target: f64) -> Self {
		let monthly = annual_target / 12.0;
		Self {
			months: MONTH_LABELS
				.iter()
				.map(|label| MonthRecord {
					month: label.to_string(),
					target: monthly,
					actual: 0.0,
				})
				.collect(),
		}
	}

	/// Accepts records only if they are exactly the twelve months in
	/// calendar order with usable amounts.
	pub fn from_records(records: Vec<MonthRecord>) -> Result<Self, PlanError> {
		if records.len() != MONTH_LABELS.len() {
			return Err(PlanError::Malformed(format!(
				"expected {} months, found {}",
				MONTH_LABELS.len(),
				records.len()
			)));
		}

		for (record, label) in records.iter().zip(MONTH_LABELS) {
			if record.month != label {
				return Err(PlanError::Malformed(format!(
					"expected {}, found {}",
					label, record.month
				)));
			}
			validate_amount(record.target)?;
			validate_amount(record.actual)?;
		}

		Ok(Self { months: records })
	}

	pub fn months(&self) -> &[MonthRecord] {
		&self.months
	}

	/// Resolves "Mar", "mar", "3" or "03" to a zero-based month index.
	pub fn month_index(month: &str) -> Result<usize, PlanError> {
		let month = month.trim();

		if let Ok(n) = month.parse::<usize>() {
			if (1..=12).contains(&n) {
				return Ok(n - 1);
			}
		}

		MONTH_LABELS
			.iter()
			.position(|label| label.eq_ignore_ascii_case(month))
			.ok_or_else(|| PlanError::UnknownMonth(month.to_string()))
	}

	pub fn set_actual(&mut self, month: &str, amount: f64) -> Result<(), PlanError> {
		validate_amount(amount)?;
		let i = Self::month_index(month)?;
		self.months[i].actual = amount;
		Ok(())
	}

	pub fn set_target(&mut self, month: &str, amount: f64) -> Result<(), PlanError> {
		validate_amount(amount)?;
		let i = Self::month_index(month)?;
		self.months[i].target = amount;
		Ok(())
	}

	pub fn total_target(&self) -> f64 {
		self.months.iter().map(|m| m.target).sum()
	}

	pub fn total_actual(&self) -> f64 {
		self.months.iter().map(|m| m.actual).sum()
	}

	/// Share of the annual target achieved so far; zero with no target.
	pub fn achievement(&self) -> f64 {
		let target = self.total_target();
		if target == 0.0 {
			return 0.0;
		}
		self.total_actual() / target
	}

	pub fn progress(&self, as_of: NaiveDate) -> Progress {
		let achieved = self.achievement();
		let elapsed = year_elapsed(as_of);

		let standing = if (achieved - elapsed).abs() < ON_TRACK_TOLERANCE {
			Standing::OnTrack
		} else if achieved > elapsed {
			Standing::Ahead
		} else {
			Standing::Behind
		};

		Progress {
			achieved,
			elapsed,
			standing,
		}
	}
}

fn validate_amount(amount: f64) -> Result<(), PlanError> {
	if !amount.is_finite() || amount < 0.0 {
		return Err(PlanError::InvalidAmount(amount));
	}
	Ok(())
}
