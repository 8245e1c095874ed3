//! Line-driven session timer.
//!
//! Open sessions only live as long as this process, so the whole
//! start/pause/resume/end cycle happens inside one `tracker timer` invocation.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use services::{SessionError, SessionLifecycleService};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;
use tracker_core::model::{SessionDetailsDraft, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerCommand {
    Pause,
    Resume,
    Status,
    End,
}

impl TimerCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "pause" | "p" => Some(Self::Pause),
            "resume" | "r" => Some(Self::Resume),
            "status" | "s" => Some(Self::Status),
            "end" | "e" | "stop" => Some(Self::End),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Started {
    session_id: SessionId,
}

#[derive(Serialize)]
struct Ack<'a> {
    session_id: SessionId,
    ok: &'a str,
}

/// Start a session and drive it from `input` until `end` or end of input.
///
/// Each accepted command prints one compact JSON line; rejected commands are
/// reported on stderr and the loop continues. Input that ends before `end`
/// abandons the session without recording it.
///
/// # Errors
///
/// Returns an error if the details are invalid (before anything starts) or if
/// reading input or writing output fails.
pub async fn run<R, W>(
    sessions: &SessionLifecycleService,
    input: R,
    out: &mut W,
    details: SessionDetailsDraft,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    details
        .clone()
        .validate()
        .context("invalid session details")?;

    let id = sessions.start();
    print_line(out, &Started { session_id: id })?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = TimerCommand::parse(&line) else {
            eprintln!("unknown command {:?}; expected pause, resume, status, or end", line.trim());
            continue;
        };

        match command {
            TimerCommand::Pause => report(out, id, "paused", sessions.pause(id))?,
            TimerCommand::Resume => report(out, id, "resumed", sessions.resume(id))?,
            TimerCommand::Status => match sessions.status(id) {
                Ok(status) => print_line(out, &status)?,
                Err(err) => eprintln!("{err}"),
            },
            TimerCommand::End => {
                let ended = sessions.end(id, details).await?;
                print_line(out, &ended)?;
                return Ok(());
            }
        }
    }

    warn!(session = %id, "input closed before end; session not recorded");
    Ok(())
}

fn report(
    out: &mut impl Write,
    id: SessionId,
    ok: &str,
    result: Result<(), SessionError>,
) -> Result<()> {
    match result {
        Ok(()) => print_line(out, &Ack { session_id: id, ok }),
        Err(err) => {
            eprintln!("{err}");
            Ok(())
        }
    }
}

fn print_line<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize output")?;
    writeln!(out, "{json}").context("failed to write output")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::SessionRegistry;
    use storage::repository::Storage;
    use tracker_core::time::fixed_clock;

    fn service() -> (SessionLifecycleService, Storage) {
        let storage = Storage::in_memory();
        let svc = SessionLifecycleService::new(fixed_clock(), SessionRegistry::new(), &storage);
        (svc, storage)
    }

    fn output_lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn parses_commands_and_shorthands() {
        assert_eq!(TimerCommand::parse(" Pause "), Some(TimerCommand::Pause));
        assert_eq!(TimerCommand::parse("r"), Some(TimerCommand::Resume));
        assert_eq!(TimerCommand::parse("stop"), Some(TimerCommand::End));
        assert_eq!(TimerCommand::parse("lunch"), None);
    }

    #[tokio::test]
    async fn full_cycle_records_the_session() {
        let (svc, storage) = service();
        let mut out = Vec::new();
        let input: &[u8] = b"pause\npause\nresume\nstatus\nbogus\nend\nstatus\n";

        run(&svc, input, &mut out, SessionDetailsDraft::default())
            .await
            .unwrap();

        let lines = output_lines(&out);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1]["ok"], "paused");
        assert_eq!(lines[2]["ok"], "resumed");
        assert_eq!(lines[3]["state"], "active");
        assert_eq!(lines[4]["session"]["status"], "completed");
        assert_eq!(lines[0]["session_id"], lines[4]["session"]["id"]);

        let history = storage.sessions.load_sessions().await.unwrap().unwrap();
        assert_eq!(history.len(), 1);
        assert!(svc.active_ids().is_empty());
    }

    #[tokio::test]
    async fn closed_input_abandons_the_session() {
        let (svc, storage) = service();
        let mut out = Vec::new();
        let input: &[u8] = b"pause\n";

        run(&svc, input, &mut out, SessionDetailsDraft::default())
            .await
            .unwrap();

        assert_eq!(output_lines(&out).len(), 2);
        assert!(storage.sessions.load_sessions().await.unwrap().is_none());
    }
}
