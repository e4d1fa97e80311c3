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
use anyhow::Error;
use chrono::{DateTime, Duration, Utc};

/// A single cached value that expires a fixed time after it was fetched.
///
/// An expired value is dropped before refreshing, and a failed refresh
/// leaves the entry empty; callers never see stale data past the TTL.
#[derive(Debug)]
pub struct CacheEntry<T> {
	value: Option<T>,
	fetched_at: Option<DateTime<Utc>>,
	ttl: Duration,
}

impl<T> CacheEntry<T> {
	pub fn new(ttl: Duration) -> Self {
		Self {
			value: None,
			fetched_at: None,
			ttl,
		}
	}

	pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
		match (&self.value, self.fetched_at) {
			(Some(_), Some(at)) => now >= at && now - at < self.ttl,
			_ => false,
		}
	}

	pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
		self.fetched_at
	}

	/// Returns the cached value if still fresh at `now`, otherwise runs
	/// `refresh` and caches its result as fetched at `now`.
	pub fn get_or_refresh<F>(
		&mut self,
		now: DateTime<Utc>,
		refresh: F,
	) -> Result<&T, Error>
	where
		F: FnOnce() -> Result<T, Error>,
	{
		if !self.is_fresh(now) {
			self.invalidate();

			let value = refresh()?;
			self.value = Some(value);
			self.fetched_at = Some(now);
		}

		self.value
			.as_ref()
			.ok_or_else(|| anyhow::anyhow!("cache entry empty after refresh"))
	}

	pub fn invalidate(&mut self) {
		self.value = None;
		self.fetched_at = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::bail;
	use std::cell::Cell;

	fn at(minutes: i64) -> DateTime<Utc> {
		DateTime::from_timestamp(1_700_000_000, 0).unwrap()
			+ Duration::minutes(minutes)
	}

	#[test]
	fn test_serves_cached_within_ttl() {
		let mut entry = CacheEntry::new(Duration::minutes(10));
		let calls = Cell::new(0);
		let fetch = || {
			calls.set(calls.get() + 1);
			Ok(calls.get())
		};

		assert_eq!(*entry.get_or_refresh(at(0), fetch).unwrap(), 1);
		assert_eq!(*entry.get_or_refresh(at(9), fetch).unwrap(), 1);
		assert!(entry.is_fresh(at(9)));
		assert_eq!(calls.get(), 1);
	}

	#[test]
	fn test_refreshes_after_ttl() {
		let mut entry = CacheEntry::new(Duration::minutes(10));
		entry.get_or_refresh(at(0), || Ok("old")).unwrap();
		assert!(!entry.is_fresh(at(10)));

		let v = entry.get_or_refresh(at(10), || Ok("new")).unwrap();
		assert_eq!(*v, "new");
		assert_eq!(entry.fetched_at(), Some(at(10)));
	}

	#[test]
	fn test_failed_refresh_discards_stale_value() {
		let mut entry = CacheEntry::new(Duration::minutes(10));
		entry.get_or_refresh(at(0), || Ok(1)).unwrap();

		let result = entry.get_or_refresh(at(30), || bail!("offline"));
		assert!(result.is_err());
		assert!(!entry.is_fresh(at(30)));
		assert_eq!(entry.fetched_at(), None);
	}

	#[test]
	fn test_invalidate() {
		let mut entry = CacheEntry::new(Duration::minutes(10));
		entry.get_or_refresh(at(0), || Ok(1)).unwrap();
		entry.invalidate();
		assert!(!entry.is_fresh(at(1)));
	}
}
