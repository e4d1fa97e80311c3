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
use crate::fetch::models::NewsParams;
use anyhow::{anyhow, Error};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use scraper::Html;

/// One headline from the syndication feed. Only the fields shown on the
/// dashboard are kept.
#[derive(Clone, Debug, PartialEq)]
pub struct NewsItem {
	pub title: String,
	pub link: String,
	pub published: Option<DateTime<FixedOffset>>,
	pub source: Option<String>,
}

/// Pulls `<item>` entries out of an RSS 2.0 document. Only the handful of
/// flat elements we display are located, by pattern; their text is then
/// decoded by a real markup parser.
pub struct RssParser {
	item_regex: Regex,
	title_regex: Regex,
	link_regex: Regex,
	date_regex: Regex,
	source_regex: Regex,
}

impl RssParser {
	pub fn new() -> Self {
		// patterns are constant and known to compile
		let re = |p: &str| Regex::new(p).unwrap();
		Self {
			item_regex: re(r"(?s)<item\b[^>]*>(.*?)</item>"),
			title_regex: re(r"(?s)<title\b[^>]*>(.*?)</title>"),
			link_regex: re(r"(?s)<link\b[^>]*>(.*?)</link>"),
			date_regex: re(r"(?s)<pubDate\b[^>]*>(.*?)</pubDate>"),
			source_regex: re(r"(?s)<source\b[^>]*>(.*?)</source>"),
		}
	}

	/// Parses at most `limit` items, in feed order. Items without a title
	/// are skipped.
	pub fn parse(&self, xml: &str, limit: usize) -> Vec<NewsItem> {
		self.item_regex
			.captures_iter(xml)
			.filter_map(|cap| self.parse_item(&cap[1]))
			.take(limit)
			.collect()
	}

	fn parse_item(&self, body: &str) -> Option<NewsItem> {
		let title = self.field(&self.title_regex, body)?;
		if title.is_empty() {
			return None;
		}

		let published = self.field(&self.date_regex, body).and_then(|d| {
			DateTime::parse_from_rfc2822(&d)
				.map_err(|e| log::debug!("unparseable pubDate {:?}: {}", d, e))
				.ok()
		});

		Some(NewsItem {
			title,
			link: self.field(&self.link_regex, body).unwrap_or_default(),
			published,
			source: self
				.field(&self.source_regex, body)
				.filter(|s| !s.is_empty()),
		})
	}

	fn field(&self, regex: &Regex, body: &str) -> Option<String> {
		regex
			.captures(body)
			.map(|cap| decode(cap[1].trim()).trim().to_string())
	}
}

/// CDATA is taken literally. Anything else is escaped text, so named and
/// numeric character references are resolved by parsing it as a fragment.
fn decode(raw: &str) -> String {
	match strip_cdata(raw) {
		Some(literal) => literal.to_string(),
		None => Html::parse_fragment(raw).root_element().text().collect(),
	}
}

fn strip_cdata(s: &str) -> Option<&str> {
	s.strip_prefix("<![CDATA[")?.strip_suffix("]]>")
}

/// Fetches headlines matching `query` from a Google News style RSS search
/// endpoint.
pub fn fetch_news(
	http: &Client,
	url: &str,
	query: &str,
	limit: usize,
) -> Result<Vec<NewsItem>, Error> {
	let xml = http
		.get_text(
			url,
			Some(NewsParams {
				q: query,
				hl: "zh-TW",
				gl: "TW",
				ceid: "TW:zh-Hant",
			}),
		)
		.map_err(|e| anyhow!("news feed unavailable: {}", e))?;

	Ok(RssParser::new().parse(&xml, limit))
}

#[cfg(test)]
mod tests {
	use super::*;

	const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>"匯率" - Google News</title>
<item>
  <title>Taiwan dollar firms as exporters sell USD &amp; JPY - Focus Taiwan</title>
  <link>https://news.example.com/a</link>
  <pubDate>Tue, 04 Mar 2025 09:15:42 GMT</pubDate>
  <source url="https://focustaiwan.tw">Focus Taiwan</source>
</item>
<item>
  <title><![CDATA[Import costs <rise> again]]></title>
  <link>https://news.example.com/b</link>
  <pubDate>not a date</pubDate>
</item>
<item>
  <title></title>
  <link>https://news.example.com/empty</link>
</item>
<item>
  <title>Third</title>
</item>
</channel></rss>"#;

	#[test]
	fn test_parse_items() {
		let items = RssParser::new().parse(FEED, 10);
		assert_eq!(items.len(), 3);

		assert_eq!(
			items[0].title,
			"Taiwan dollar firms as exporters sell USD & JPY - Focus Taiwan"
		);
		assert_eq!(items[0].link, "https://news.example.com/a");
		assert_eq!(items[0].source.as_deref(), Some("Focus Taiwan"));
		assert_eq!(
			items[0].published.unwrap().format("%Y-%m-%d %H:%M").to_string(),
			"2025-03-04 09:15"
		);

		assert_eq!(items[1].title, "Import costs <rise> again");
		assert_eq!(items[1].published, None);
		assert_eq!(items[1].source, None);

		assert_eq!(items[2].link, "");
	}

	#[test]
	fn test_character_references() {
		let items = RssParser::new().parse(
			"<item><title>TSMC&#8217;s margin &#x4E2D; &nbsp;up</title>\
			 <link>https://news.example.com/?a=1&amp;b=2</link></item>",
			5,
		);
		assert_eq!(items[0].title, "TSMC\u{2019}s margin \u{4E2D} \u{a0}up");
		assert_eq!(items[0].link, "https://news.example.com/?a=1&b=2");
	}

	#[test]
	fn test_limit() {
		assert_eq!(RssParser::new().parse(FEED, 1).len(), 1);
		assert!(RssParser::new().parse("<rss></rss>", 5).is_empty());
	}
}
