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
use crate::revenue::plan::{MonthRecord, RevenuePlan};
use anyhow::{anyhow, Error};
use std::fs;
use std::path::Path;

/// A loaded plan, plus the reason an existing file was set aside when one
/// was.
pub struct Loaded {
	pub plan: RevenuePlan,

	/// Set when the file existed but could not be used; saving will
	/// replace its contents with the default plan.
	pub discarded: Option<Error>,
}

/// Reads the plan stored at `path`.
///
/// Never fails: a missing file, an unreadable row, or anything other than
/// the twelve months in order yields the default plan for
/// `annual_target`. The file itself is left alone until the next save.
pub fn load(path: &Path, annual_target: f64) -> Loaded {
	if !path.exists() {
		log::info!("no plan at {}, starting a new one", path.display());
		return Loaded {
			plan: RevenuePlan::new(annual_target),
			discarded: None,
		};
	}

	match read_records(path).and_then(|records| {
		RevenuePlan::from_records(records).map_err(Error::from)
	}) {
		Ok(plan) => Loaded {
			plan,
			discarded: None,
		},
		Err(e) => {
			log::warn!(
				"ignoring unusable plan at {}: {}; using defaults",
				path.display(),
				e
			);
			Loaded {
				plan: RevenuePlan::new(annual_target),
				discarded: Some(e),
			}
		},
	}
}

fn read_records(path: &Path) -> Result<Vec<MonthRecord>, Error> {
	let mut reader = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_path(path)?;

	let mut records = Vec::new();
	for record in reader.deserialize() {
		records.push(record?);
	}
	Ok(records)
}

/// Writes the plan as `month,target,actual` rows, replacing whatever was
/// there. Creates parent directories as needed.
pub fn save(plan: &RevenuePlan, path: &Path) -> Result<(), Error> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}

	let mut writer = csv::Writer::from_path(path)
		.map_err(|e| anyhow!("cannot write plan to {}: {}", path.display(), e))?;

	for record in plan.months() {
		writer.serialize(record)?;
	}
	writer.flush()?;

	log::info!("saved plan to {}", path.display());
	Ok(())
}
