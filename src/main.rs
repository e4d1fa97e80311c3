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
use crate::config::config_file::{Config, Market, News, Revenue};
use crate::config::filesystem::Filesystem;
use crate::fetch::bank_of_taiwan::RateSource;
use crate::fetch::http::Client;
use crate::fetch::news::fetch_news;
use crate::fetch::yahoo::{Period, Quote, Yahoo};
use crate::fx::conversion::{convert, cross_rate_matrix};
use crate::fx::error::RateError;
use crate::fx::exposure::{export_impact, import_impact};
use crate::fx::rate_table::RateTable;
use crate::fx::registry::Registry;
use crate::reports::market_reporter::{render_history, render_news, render_quotes};
use crate::reports::plan_reporter::PlanReporter;
use crate::reports::rate_reporter::{
	render_conversion, render_exposure, render_matrix, RateReporter,
};
use crate::reports::unavailable;
use crate::revenue::store::{self, Loaded};
use crate::util::cache::CacheEntry;
use crate::util::date::{parse_date, to_minute, today};
use anyhow::{anyhow, bail, Error};
use chrono::{Duration, Local, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;
use std::thread;

mod config;
mod fetch;
mod fx;
mod reports;
mod revenue;
mod util;

#[derive(Parser)]
#[command(
	name = "fxboard",
	version = "0.1",
	about = "Terminal dashboard for Bank of Taiwan exchange rates"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Currency for history, ticker for quotes, query for news, or month
	/// for the plan commands
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom config file location (default: ~/.config/fxboard/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Read the rate feed from this CSV file instead of the bank
	#[arg(short, long)]
	feed: Option<String>,

	/// Amount to convert, notional for impact reports, or plan amount
	#[arg(short, long)]
	amount: Option<f64>,

	/// Source currency for conversion
	#[arg(long, default_value = "USD")]
	from: String,

	/// Target currency for conversion
	#[arg(long, default_value = "TWD")]
	to: String,

	/// Foreign currency for impact reports
	#[arg(short, long)]
	currency: Option<String>,

	/// Reference rate (TWD per unit) for impact reports
	#[arg(short, long)]
	reference: Option<f64>,

	/// Range of history to show
	#[arg(long, value_enum, default_value = "1mo")]
	period: Period,

	/// Revenue plan file (default: from config, then
	/// ~/.config/fxboard/revenue.csv)
	#[arg(long)]
	plan: Option<String>,

	/// Annual revenue target used when a new plan is created
	#[arg(long)]
	target: Option<f64>,

	/// Measure plan progress as of this date (YYYY-MM-DD)
	#[arg(short, long)]
	date: Option<String>,

	/// Seconds between dashboard refreshes in watch mode
	#[arg(long, default_value_t = 60)]
	interval: u64,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if self.interval == 0 {
			bail!("Interval must be at least one second");
		}

		if let Some(target) = self.target {
			if !target.is_finite() || target < 0.0 {
				bail!("Annual target must be a non-negative number");
			}
		}

		if let Some(date) = &self.date {
			parse_date(date)?;
		}

		Ok(())
	}

	fn amount(&self) -> Result<f64, Error> {
		self.amount
			.ok_or_else(|| anyhow!("No amount specified (use --amount)"))
	}

	fn as_of(&self) -> Result<NaiveDate, Error> {
		match &self.date {
			Some(date) => parse_date(date),
			None => Ok(today()),
		}
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Rates,   // spot-sell rate table
	Convert, // convert an amount between two currencies
	Matrix,  // cross-rate matrix

	ImportImpact, // TWD impact of rate drift on a payable
	ExportImpact, // TWD impact of rate drift on a receivable

	History, // daily history of one currency against TWD
	Quotes,  // latest equity/index quotes
	News,    // exchange-rate headlines

	Plan,       // revenue plan and progress
	PlanSet,    // record a month's actual revenue
	PlanTarget, // change a month's target

	Dashboard, // every section once
	Watch,     // the dashboard, refreshed until interrupted
}

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

fn main() -> Result<(), Error> {
	env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
		.init();

	let args = Cli::parse();
	args.validate()?;

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref())?;
	let ctx = Context::new(&args, fs, config)?;

	match args.command {
		Directive::Rates => {
			if let Some(rates) = ctx.rates_for("Exchange rates") {
				RateReporter::new(&rates, &ctx.registry).print_rates();
			}
		},
		Directive::Convert => {
			let amount = args.amount()?;
			let from = args.from.trim().to_uppercase();
			let to = args.to.trim().to_uppercase();

			if let Some(rates) = ctx.rates_for("Conversion") {
				let result = convert(amount, &from, &to, &rates)?;
				print!("{}", render_conversion(amount, &from, &to, result));
			}
		},
		Directive::Matrix => {
			if let Some(rates) = ctx.rates_for("Cross rates") {
				RateReporter::new(&rates, &ctx.registry)
					.print_matrix(&cross_rate_matrix(&rates));
			}
		},
		Directive::ImportImpact | Directive::ExportImpact => {
			let currency = args
				.currency
				.as_ref()
				.or(args.term.as_ref())
				.ok_or_else(|| anyhow!("No currency specified (use --currency)"))?
				.trim()
				.to_uppercase();
			let reference = args.reference.ok_or_else(|| {
				anyhow!("No reference rate specified (use --reference)")
			})?;
			let notional = args.amount()?;

			if let Some(rates) = ctx.rates_for("Exposure") {
				let exposure = if args.command == Directive::ImportImpact {
					import_impact(notional, &currency, reference, &rates)?
				} else {
					export_impact(notional, &currency, reference, &rates)?
				};
				print!("{}", render_exposure(&exposure));
			}
		},
		Directive::History => {
			let code = args.term.as_deref().unwrap_or("USD");
			let currency = ctx
				.registry
				.get(code)
				.ok_or_else(|| RateError::UnknownCurrency(code.to_uppercase()))?;
			let symbol = currency.market_symbol.as_deref().ok_or_else(|| {
				anyhow!("No market symbol configured for {}", currency.code)
			})?;

			match ctx.yahoo().history(symbol, args.period) {
				Ok(history) => {
					print!("{}", render_history(&history, args.period))
				},
				Err(e) => print_unavailable("History", &e),
			}
		},
		Directive::Quotes => {
			let symbols = match &args.term {
				Some(ticker) => vec![ticker.clone()],
				None => ctx.market.tickers(),
			};
			print!("{}", render_quotes(&ctx.quotes(&symbols)));
		},
		Directive::News => {
			let query = args.term.clone().unwrap_or_else(|| ctx.news.query());
			match fetch_news(&ctx.http, &ctx.news.url(), &query, ctx.news.limit())
			{
				Ok(items) => print!("{}", render_news(&items)),
				Err(e) => print_unavailable("News", &e),
			}
		},
		Directive::Plan => {
			let (loaded, _) = ctx.load_plan()?;
			PlanReporter::new(&loaded.plan).print(args.as_of()?);
		},
		Directive::PlanSet | Directive::PlanTarget => {
			let Some(month) = args.term.as_deref() else {
				bail!("No month specified");
			};
			let amount = args.amount()?;

			let (Loaded { mut plan, discarded }, path) = ctx.load_plan()?;
			if let Some(e) = discarded {
				eprintln!(
					"Warning: could not read plan at {} ({}); saving will replace it with a fresh plan",
					path.display(),
					e
				);
			}

			if args.command == Directive::PlanSet {
				plan.set_actual(month, amount)?;
			} else {
				plan.set_target(month, amount)?;
			}
			store::save(&plan, &path)?;

			PlanReporter::new(&plan).print(args.as_of()?);
		},
		Directive::Dashboard => {
			let rates = ctx.rates();
			print!("{}", ctx.render_dashboard(rates.as_ref())?);
		},
		Directive::Watch => watch(&ctx)?,
	}

	Ok(())
}

/// Redraws the dashboard every `--interval` seconds. The rate table is
/// served from cache until it is older than the configured TTL; the other
/// sections are fetched on every pass.
fn watch(ctx: &Context) -> Result<(), Error> {
	let mut cache: CacheEntry<RateTable> =
		CacheEntry::new(ctx.ttl);
	let pause = std::time::Duration::from_secs(ctx.args.interval);

	loop {
		let fetched = cache.get_or_refresh(Utc::now(), || ctx.rates());
		let dashboard = ctx.render_dashboard(fetched.as_ref().map(|t| *t))?;

		print!("{}", CLEAR_SCREEN);
		match cache.fetched_at() {
			Some(at) => println!(
				"Updated {}, rates from {}",
				to_minute(&Local::now()),
				to_minute(&at.with_timezone(&Local))
			),
			None => println!("Updated {}", to_minute(&Local::now())),
		}
		print!("{}", dashboard);

		thread::sleep(pause);
	}
}

/// Flags and configuration resolved once for whichever directive runs.
struct Context<'a> {
	args: &'a Cli,
	fs: Filesystem,
	registry: Registry,
	http: Client,
	source: RateSource,
	ttl: Duration,
	market: Market,
	news: News,
	revenue: Revenue,
}

impl<'a> Context<'a> {
	fn new(args: &'a Cli, fs: Filesystem, config: Config) -> Result<Self, Error> {
		let registry = match &config.currencies {
			Some(entries) => Registry::from_entries(entries)?,
			None => Registry::default(),
		};

		let feed = config.feed.unwrap_or_default();
		let ttl = feed.ttl()?;
		let http = Client::new(feed.timeout_secs())?;

		let source = match &args.feed {
			Some(path) => RateSource::File(PathBuf::from(path)),
			None => RateSource::Remote {
				client: http.clone(),
				url: feed.url(),
			},
		};

		Ok(Self {
			args,
			fs,
			registry,
			http,
			source,
			ttl,
			market: config.market.unwrap_or_default(),
			news: config.news.unwrap_or_default(),
			revenue: config.revenue.unwrap_or_default(),
		})
	}

	fn rates(&self) -> Result<RateTable, Error> {
		self.source.fetch(&self.registry)
	}

	/// The rate table, or `None` once `section` has been reported as
	/// unavailable.
	fn rates_for(&self, section: &str) -> Option<RateTable> {
		match self.rates() {
			Ok(rates) => Some(rates),
			Err(e) => {
				print_unavailable(section, &e);
				None
			},
		}
	}

	fn yahoo(&self) -> Yahoo<'_> {
		Yahoo::new(&self.http, &self.market.chart_url())
	}

	fn quotes(&self, symbols: &[String]) -> Vec<(String, Result<Quote, Error>)> {
		let yahoo = self.yahoo();
		symbols
			.iter()
			.map(|symbol| (symbol.clone(), yahoo.quote(symbol)))
			.collect()
	}

	/// Loads the plan and returns it with the path it belongs to. Only
	/// locating the file can fail; an unusable file yields a fresh plan.
	fn load_plan(&self) -> Result<(Loaded, PathBuf), Error> {
		let path = self
			.fs
			.plan_path(self.args.plan.as_ref(), self.revenue.file.as_ref())?;
		let annual = self
			.args
			.target
			.unwrap_or_else(|| self.revenue.annual_target());

		Ok((store::load(&path, annual), path))
	}

	/// Renders every section, replacing any that fail with a one-line
	/// notice so the rest still show.
	fn render_dashboard(
		&self,
		rates: Result<&RateTable, &Error>,
	) -> Result<String, Error> {
		let as_of = self.args.as_of()?;
		let mut out = String::new();

		out.push_str(&heading("Exchange rates"));
		match rates {
			Ok(table) => {
				out.push_str(
					&RateReporter::new(table, &self.registry).render_rates(),
				);
				out.push('\n');
				out.push_str(&heading("Cross rates"));
				out.push_str(&render_matrix(&cross_rate_matrix(table)));
			},
			Err(e) => {
				log::warn!("rate table unavailable: {}", e);
				out.push_str(&unavailable("Exchange rates", e));
			},
		}

		out.push('\n');
		out.push_str(&heading("Market"));
		out.push_str(&render_quotes(&self.quotes(&self.market.tickers())));

		out.push('\n');
		out.push_str(&heading("News"));
		match fetch_news(
			&self.http,
			&self.news.url(),
			&self.news.query(),
			self.news.limit(),
		) {
			Ok(items) => out.push_str(&render_news(&items)),
			Err(e) => {
				log::warn!("{}", e);
				out.push_str(&unavailable("News", e));
			},
		}

		out.push('\n');
		out.push_str(&heading("Revenue"));
		match self.load_plan() {
			Ok((loaded, _)) => {
				out.push_str(&PlanReporter::new(&loaded.plan).render(as_of))
			},
			Err(e) => {
				log::warn!("revenue plan unavailable: {}", e);
				out.push_str(&unavailable("Revenue", e));
			},
		}

		Ok(out)
	}
}

fn heading(title: &str) -> String {
	format!("== {} ==\n", title)
}

fn print_unavailable(section: &str, err: &Error) {
	log::warn!("{} unavailable: {}", section, err);
	print!("{}", unavailable(section, err));
}
