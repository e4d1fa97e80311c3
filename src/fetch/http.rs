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
use anyhow::{anyhow, bail, Error};
use reqwest::blocking::Response;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Yahoo and Google both refuse the default reqwest agent
const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Blocking HTTP client shared by every fetcher. Each request either
/// completes or times out; there is no retry.
#[derive(Clone)]
pub struct Client {
	client: reqwest::blocking::Client,
}

impl Client {
	pub fn new(timeout_secs: u64) -> Result<Self, Error> {
		let mut headers = HeaderMap::new();
		headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

		let client = reqwest::blocking::Client::builder()
			.default_headers(headers)
			.timeout(Duration::from_secs(timeout_secs))
			.build()
			.map_err(|e| anyhow!("failed to create HTTP client: {}", e))?;

		Ok(Self { client })
	}

	/// Sends a GET and returns the body as text with any UTF-8 byte order
	/// mark removed. Errors on non-2xx response codes.
	pub fn get_text<Q>(
		&self,
		url: &str,
		query_params: Option<Q>,
	) -> Result<String, Error>
	where
		Q: Serialize,
	{
		let response = self.send(url, query_params)?;
		let bytes = response.bytes()?;
		let text = String::from_utf8_lossy(&bytes);

		Ok(text.trim_start_matches('\u{feff}').to_string())
	}

	/// Sends a GET and decodes a JSON body. Errors on non-2xx response codes.
	pub fn get_json<Q, R>(
		&self,
		url: &str,
		query_params: Option<Q>,
	) -> Result<R, Error>
	where
		Q: Serialize,
		R: for<'de> Deserialize<'de>,
	{
		let response = self.send(url, query_params)?;
		let response_data: R = response
			.json()
			.map_err(|e| anyhow!("failed to decode response from {}: {}", url, e))?;
		Ok(response_data)
	}

	fn send<Q>(&self, url: &str, query_params: Option<Q>) -> Result<Response, Error>
	where
		Q: Serialize,
	{
		let mut request = self.client.request(Method::GET, url);

		if let Some(query_params) = query_params {
			request = request.query(&query_params);
		}

		log::debug!("sending GET to {}", url);
		let response = request
			.send()
			.map_err(|e| anyhow!("request to {} failed: {}", url, e))?;

		// Handle non-2xx response codes
		if !response.status().is_success() {
			bail!("request to {} failed with status: {}", url, response.status());
		}

		Ok(response)
	}
}
