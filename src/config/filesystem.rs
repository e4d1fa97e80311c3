/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
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
use crate::config::config_file::Config;
use anyhow::{anyhow, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::PathBuf;

const CONFIG_DIR: &str = ".config/fxboard";
const CONFIG_FILE: &str = "config.toml";
const PLAN_FILE: &str = "revenue.csv";

/// Locates the files the dashboard reads and writes.
pub struct Filesystem {
	home: Option<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self { home: home_dir() }
	}

	fn config_dir(&self) -> Result<PathBuf, Error> {
		self.home
			.as_ref()
			.map(|h| h.join(CONFIG_DIR))
			.ok_or_else(|| anyhow!("unable to determine home directory"))
	}

	/// Fetches the config from the given path, or the default path if none.
	/// The default file is created empty on first use; a custom path must
	/// already exist.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match custom_config_path {
			None => self.config_dir()?.join(CONFIG_FILE),
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(&config_path)?;
			log::info!("created empty config at {}", config_path.display());
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;

		toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))
	}

	/// Resolves where the revenue plan lives: an explicit path wins, then
	/// the configured one, then the default next to the config file.
	pub fn plan_path(
		&self,
		explicit: Option<&String>,
		configured: Option<&String>,
	) -> Result<PathBuf, Error> {
		if let Some(p) = explicit {
			return Ok(PathBuf::from(p));
		}

		match configured {
			Some(p) => self.expand_home(p),
			None => Ok(self.config_dir()?.join(PLAN_FILE)),
		}
	}

	fn expand_home(&self, path: &str) -> Result<PathBuf, Error> {
		match path.strip_prefix("~/") {
			Some(rest) => Ok(self
				.home
				.as_ref()
				.ok_or_else(|| anyhow!("unable to determine home directory"))?
				.join(rest)),
			None => Ok(PathBuf::from(path)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn fs_with_home(home: &str) -> Filesystem {
		Filesystem {
			home: Some(PathBuf::from(home)),
		}
	}

	#[test]
	fn test_plan_path_precedence() {
		let fs = fs_with_home("/home/op");
		let explicit = "/tmp/a.csv".to_string();
		let configured = "~/plans/b.csv".to_string();

		assert_eq!(
			fs.plan_path(Some(&explicit), Some(&configured)).unwrap(),
			PathBuf::from("/tmp/a.csv")
		);
		assert_eq!(
			fs.plan_path(None, Some(&configured)).unwrap(),
			PathBuf::from("/home/op/plans/b.csv")
		);
		assert_eq!(
			fs.plan_path(None, None).unwrap(),
			PathBuf::from("/home/op/.config/fxboard/revenue.csv")
		);
	}

	#[test]
	fn test_missing_home() {
		let fs = Filesystem { home: None };
		assert!(fs.plan_path(None, None).is_err());
		let absolute = "/srv/plan.csv".to_string();
		assert!(fs.plan_path(None, Some(&absolute)).is_ok());
	}

	#[test]
	fn test_custom_config() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[news]\nquery = \"shipping\"").unwrap();
		let path = file.path().to_string_lossy().to_string();

		let config = Filesystem::new().get_config(Some(&path)).unwrap();
		assert_eq!(config.news.unwrap().query(), "shipping");
	}

	#[test]
	fn test_custom_config_must_exist() {
		let path = "/nonexistent/fxboard/config.toml".to_string();
		assert!(Filesystem::new().get_config(Some(&path)).is_err());
	}
}
