//! Deterministic replay of a timed command script.
//!
//! Script format, one step per line:
//!
//! ```text
//! # offset_ms command
//! 0     mode countdown
//! 0     set 0 5
//! 0     start
//! 5000  status
//! ```
//!
//! Offsets are milliseconds on a manual clock starting at 0 and must not go
//! backwards. Before each command a tick runs at that offset, so countdown
//! expiry shows up exactly where a live display would have caught it.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use lapwatch_core::{Event, ManualClock, Session, TimeTracker, TrackerMode};
use serde_json::{json, Value};

use super::input::InputCommand;

#[derive(Args)]
pub struct ReplayArgs {
    /// Script file, or '-' for stdin
    pub script: PathBuf,
    /// Mode the tracker starts in
    #[arg(long, default_value = "countup")]
    pub mode: TrackerMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub offset_ms: u64,
    pub command: InputCommand,
}

pub fn parse_script(src: &str) -> Result<Vec<Step>, String> {
    let mut steps = Vec::new();
    let mut last_offset = 0;

    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let (offset, rest) = text
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("line {line}: expected '<offset_ms> <command>'"))?;
        let offset_ms: u64 = offset
            .parse()
            .map_err(|_| format!("line {line}: invalid offset '{offset}'"))?;
        if offset_ms < last_offset {
            return Err(format!(
                "line {line}: offset {offset_ms} is earlier than {last_offset}"
            ));
        }
        let command = rest
            .parse::<InputCommand>()
            .map_err(|e| format!("line {line}: {e}"))?;

        last_offset = offset_ms;
        steps.push(Step {
            line,
            offset_ms,
            command,
        });
    }

    Ok(steps)
}

/// Run the steps and return one JSON value per output line.
pub fn replay(steps: &[Step], mode: TrackerMode) -> Vec<Value> {
    let clock = ManualClock::new(0);
    let mut session = Session::with_tracker(TimeTracker::with_mode(mode), clock.clone());
    let mut out = Vec::new();

    for step in steps {
        clock.set(step.offset_ms);
        out.extend(session.tick().events.iter().filter_map(to_json));

        if step.command == InputCommand::Quit {
            break;
        }
        match step.command.apply(&mut session) {
            Ok(events) => out.extend(events.iter().filter_map(to_json)),
            Err(e) => out.push(json!({
                "type": "Error",
                "line": step.line,
                "offset_ms": step.offset_ms,
                "message": e.to_string(),
            })),
        }
    }

    out
}

fn to_json(event: &Event) -> Option<Value> {
    serde_json::to_value(event)
        .map_err(|e| tracing::error!("failed to encode event: {e}"))
        .ok()
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let src = if args.script.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.script)?
    };

    let steps = parse_script(&src)?;
    tracing::debug!(steps = steps.len(), "replaying script");
    for value in replay(&steps, args.mode) {
        println!("{}", serde_json::to_string(&value)?);
    }
    Ok(())
}
