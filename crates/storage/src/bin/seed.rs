use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use storage::repository::Storage;
use tracker_core::model::{ProgressState, SessionDetailsDraft, SessionId, SessionRecord};

/// Write consecutive daily manual sessions into a tracker data directory.
#[derive(Debug, Clone, Parser)]
#[command(name = "seed")]
struct Args {
    /// Directory holding the JSON documents
    #[arg(long, env = "TRACKER_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Consecutive days of sessions to write
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Hours per day
    #[arg(long, default_value_t = 2.0)]
    hours: f64,

    /// Timestamp of the most recent day (RFC 3339, default: now)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("expected RFC 3339: {err}"))
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::json_dir(&args.data_dir);
    let now = args.now.unwrap_or_else(Utc::now);

    let mut progress = ProgressState::new(now);
    let mut sessions = Vec::new();
    let topics = ["ownership", "traits", "async", "error handling"];

    for i in (0..args.days).rev() {
        let day = now - Duration::days(i64::from(i));
        let started_at = day - Duration::hours(3);
        let details = SessionDetailsDraft {
            notes: format!("seeded day {}", args.days - i),
            topics: vec![topics[(i as usize) % topics.len()].to_owned()],
            ..SessionDetailsDraft::default()
        }
        .validate()?;
        let record = SessionRecord::manual(SessionId::generate(), started_at, args.hours, details)?;
        progress.record_session(&record, day.date_naive(), now);
        sessions.push(record);
    }

    storage.sessions.save_sessions(&sessions).await?;
    storage.progress.save_progress(&progress).await?;

    println!(
        "Seeded {} sessions ({:.1} h total, streak {}) into {}",
        sessions.len(),
        progress.total_hours(),
        progress.current_streak(),
        args.data_dir.display()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
