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
use anyhow::{anyhow, Error};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

/// Calendar month labels in calendar order.
pub const MONTH_LABELS: [&str; 12] = [
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct",
	"Nov", "Dec",
];

/// Parses a date in the "YYYY-MM-DD" format.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, Error> {
	NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
		.map_err(|e| anyhow!("invalid date {:?} (want YYYY-MM-DD): {}", date_str, e))
}

pub fn today() -> NaiveDate {
	Local::now().date_naive()
}

pub fn days_in_year(year: i32) -> u32 {
	NaiveDate::from_ymd_opt(year, 12, 31)
		.map(|d| d.ordinal())
		.unwrap_or(365)
}

/// Fraction of the calendar year that has passed by the end of `date`.
/// Dec 31 is always exactly 1.0, leap years included.
pub fn year_elapsed(date: NaiveDate) -> f64 {
	date.ordinal() as f64 / days_in_year(date.year()) as f64
}

/// Renders a timestamp at minute precision, e.g. "2025-03-04 09:15".
pub fn to_minute<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
	Tz::Offset: std::fmt::Display,
{
	timestamp.format("%Y-%m-%d %H:%M").to_string()
}
