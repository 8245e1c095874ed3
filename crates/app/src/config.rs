//! Runtime configuration resolved from flags, environment, and defaults.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use services::Clock;
use tracker_core::ProgramPlan;
use tracing_subscriber::EnvFilter;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Directory holding progress.json, sessions.json and goals.json
    #[arg(long, global = true, env = "TRACKER_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// First day of the program (YYYY-MM-DD)
    #[arg(long, global = true, env = "TRACKER_START_DATE", value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Pin the clock to a fixed instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, global = true, env = "TRACKER_NOW", value_parser = parse_instant, hide = true)]
    pub now: Option<DateTime<Utc>>,

    /// Log lifecycle details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub plan: ProgramPlan,
    pub clock: Clock,
}

impl Config {
    /// # Errors
    ///
    /// Fails if the configured program plan does not validate.
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let plan = ProgramPlan::standard()
            .with_start_date(args.start_date.unwrap_or_else(ProgramPlan::default_start_date));
        plan.validate().context("invalid program plan")?;

        let clock = args.now.map_or_else(Clock::default_clock, Clock::fixed);

        Ok(Self {
            data_dir: args.data_dir.clone(),
            plan,
            clock,
        })
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tracker=debug,services=debug,storage=debug,info"
    } else {
        "tracker=info,services=info,storage=warn,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got {raw:?}"))
}

/// RFC 3339 timestamp, or a bare date meaning midnight UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    bail!("expected an RFC 3339 timestamp or YYYY-MM-DD, got {raw:?}")
}
