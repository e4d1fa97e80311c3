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
use thiserror::Error;

/// Failures of the rate arithmetic. Lookups never fall back to a default
/// rate; a currency missing from the table is always reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
	#[error("unknown currency: {0}")]
	UnknownCurrency(String),

	#[error("rate for {currency} must be positive, got {rate}")]
	NonPositiveRate { currency: String, rate: f64 },

	#[error("amount must be a finite number, got {0}")]
	InvalidAmount(f64),
}
