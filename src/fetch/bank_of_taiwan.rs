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
use crate::fx::feed_parser::parse_feed;
use crate::fx::rate_table::RateTable;
use crate::fx::registry::Registry;
use anyhow::{anyhow, Error};
use std::fs;
use std::path::PathBuf;

/// Where the daily rate table comes from.
pub enum RateSource {
	/// The Bank of Taiwan CSV endpoint
	Remote { client: Client, url: String },

	/// A previously downloaded copy of the same CSV
	File(PathBuf),
}

impl RateSource {
	/// Loads the feed and parses it. Transport and I/O failures are
	/// errors; a feed that parses to nothing but TWD is not, and callers
	/// decide what an empty table means to them.
	pub fn fetch(&self, registry: &Registry) -> Result<RateTable, Error> {
		let text = match self {
			RateSource::Remote { client, url } => {
				client.get_text(url, None::<()>)?
			},
			RateSource::File(path) => fs::read_to_string(path).map_err(|e| {
				anyhow!("failed to read rate feed {}: {}", path.display(), e)
			})?,
		};

		let table = parse_feed(&text, registry);
		if !table.has_foreign_rates() {
			log::warn!("rate feed contained no usable rates");
		} else {
			log::debug!("rate feed yielded {} currencies", table.len());
		}

		Ok(table)
	}
}
