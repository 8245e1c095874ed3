use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use services::TrackerServices;
use tracker_core::model::{SessionDetailsDraft, StageId};

use crate::config::parse_instant;
use crate::timer;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Status, stage progress, recent sessions, and weekly stats in one document
    Dashboard,
    /// Actual versus expected hours for today
    Status,
    /// One stage with its progress and checked topics/projects
    Stage { id: u8 },
    /// Check or uncheck a stage topic
    ToggleTopic { stage: u8, index: usize },
    /// Check or uncheck a stage project
    ToggleProject { stage: u8, index: usize },
    /// Record time that was not tracked live
    Log {
        /// Hours studied (0 to 24)
        hours: f64,
        #[command(flatten)]
        details: DetailsArgs,
        /// When the session happened (RFC 3339 or YYYY-MM-DD, default: now)
        #[arg(long, value_parser = parse_instant)]
        date: Option<DateTime<Utc>>,
    },
    /// Time a session interactively; reads pause/resume/status/end from stdin
    Timer {
        #[command(flatten)]
        details: DetailsArgs,
    },
    /// Hours per program week so far
    Weekly,
    /// Best day, velocity trend, and consistency
    Stats,
    /// Insights and recommendations
    Insights,
    /// Show goals, or update them with --daily/--weekly
    Goals {
        #[arg(long)]
        daily: Option<f64>,
        #[arg(long)]
        weekly: Option<f64>,
    },
    /// Dump every document as one JSON value
    Export,
    /// Reset all documents to defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Notes and ratings attached to a session when it ends.
#[derive(Debug, Clone, Args)]
pub struct DetailsArgs {
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Topic covered; repeat for several
    #[arg(long = "topic")]
    pub topics: Vec<String>,
    #[arg(long, default_value = "")]
    pub mood: String,
    /// Difficulty from 1 to 5
    #[arg(long, default_value_t = 3)]
    pub difficulty: u8,
}

impl DetailsArgs {
    #[must_use]
    pub fn draft(&self) -> SessionDetailsDraft {
        SessionDetailsDraft {
            notes: self.notes.clone(),
            topics: self.topics.clone(),
            mood: self.mood.clone(),
            difficulty: self.difficulty,
        }
    }
}

/// Execute one subcommand, writing its JSON result to `out`.
///
/// # Errors
///
/// Returns an error for rejected input (unknown stage, bad duration, invalid goals)
/// or when stdout cannot be written.
pub async fn run(command: Command, services: &TrackerServices, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Dashboard => print_json(out, &services.progress().dashboard().await),
        Command::Status => print_json(out, &services.progress().progress_status().await),
        Command::Stage { id } => {
            let details = services.stages().details(StageId::new(id)).await?;
            print_json(out, &details)
        }
        Command::ToggleTopic { stage, index } => {
            let outcome = services
                .stages()
                .toggle_topic(StageId::new(stage), index)
                .await?;
            print_json(out, &outcome)
        }
        Command::ToggleProject { stage, index } => {
            let outcome = services
                .stages()
                .toggle_project(StageId::new(stage), index)
                .await?;
            print_json(out, &outcome)
        }
        Command::Log {
            hours,
            details,
            date,
        } => {
            let ended = services
                .sessions()
                .add_manual(hours, details.draft(), date)
                .await?;
            print_json(out, &ended)
        }
        Command::Timer { details } => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            timer::run(&services.sessions(), stdin, out, details.draft()).await
        }
        Command::Weekly => print_json(out, &services.progress().weekly_stats().await),
        Command::Stats => print_json(out, &services.progress().productivity_stats().await),
        Command::Insights => print_json(out, &services.insights().await),
        Command::Goals { daily, weekly } => {
            let goals_service = services.goals();
            let goals = if daily.is_none() && weekly.is_none() {
                goals_service.load().await
            } else {
                let current = goals_service.load().await;
                goals_service
                    .set_goals(
                        daily.unwrap_or(current.daily_hours()),
                        weekly.unwrap_or(current.weekly_hours()),
                    )
                    .await?
            };
            print_json(out, &goals)
        }
        Command::Export => print_json(out, &services.data().export().await),
        Command::Reset { yes } => {
            if !yes {
                bail!("reset discards all progress; pass --yes to confirm");
            }
            services.data().reset().await;
            print_json(out, &serde_json::json!({ "reset": true }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    writeln!(out, "{json}").context("failed to write output")?;
    Ok(())
}
