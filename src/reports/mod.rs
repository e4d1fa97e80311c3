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
pub mod market_reporter;
pub mod plan_reporter;
pub mod rate_reporter;
pub mod table;

use std::fmt::Display;

/// The line printed in place of a section whose data could not be loaded.
pub fn unavailable<E: Display>(section: &str, err: E) -> String {
	format!("{}: unavailable ({})\n", section, err)
}
