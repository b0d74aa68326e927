//! Interactive session: stdin lines drive the tracker, a ticker drives the display.

use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex};

use clap::Args;
use lapwatch_core::{
    format_duration, Config, CountdownInput, Event, Session, SystemClock, TickControl, Ticker,
    TimeTracker, TrackerMode,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::input::InputCommand;

#[derive(Args)]
pub struct RunArgs {
    /// Mode to start in (countup or countdown)
    #[arg(long)]
    pub mode: Option<TrackerMode>,
    /// Countdown minutes (non-numeric counts as 0)
    #[arg(long)]
    pub minutes: Option<String>,
    /// Countdown seconds (non-numeric counts as 0)
    #[arg(long)]
    pub seconds: Option<String>,
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Never redraw the read-out, even on a terminal
    #[arg(long)]
    pub no_render: bool,
}

/// Where events and read-outs go.
#[derive(Debug, Clone, Copy)]
struct Printer {
    json: bool,
    bell: bool,
    render: bool,
}

/// Carriage return plus erase-line, so a shorter line fully covers the read-out.
const CLEAR_LINE: &str = "\r\x1b[2K";

impl Printer {
    fn events(&self, events: &[Event]) {
        for event in events {
            self.event(event);
        }
    }

    fn event(&self, event: &Event) {
        if let Some(line) = self.event_line(event) {
            println!("{line}");
        }
        // The bell byte would corrupt a JSON line stream.
        if self.bell && !self.json && matches!(event, Event::CountdownExpired { .. }) {
            print!("\x07");
            let _ = std::io::stdout().flush();
        }
    }

    fn event_line(&self, event: &Event) -> Option<String> {
        let text = if self.json {
            match serde_json::to_string(event) {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("failed to encode event: {e}");
                    return None;
                }
            }
        } else {
            describe(event)
        };
        Some(format!("{}{text}", self.prefix()))
    }

    fn render(&self, display: &str) {
        if self.render {
            print!("{}{display}", self.prefix());
            let _ = std::io::stdout().flush();
        }
    }

    fn prefix(&self) -> &'static str {
        if self.render {
            CLEAR_LINE
        } else {
            ""
        }
    }
}

/// Human-readable event line.
fn describe(event: &Event) -> String {
    match event {
        Event::TrackerStarted { mode, from_ms, .. } => {
            format!("started {mode} at {}", format_duration(*from_ms as i64))
        }
        Event::TrackerStopped { value_ms, .. } => {
            format!("stopped at {}", format_duration(*value_ms as i64))
        }
        Event::TrackerReset { .. } => "reset".to_string(),
        Event::ModeSwitched { to, .. } => format!("mode: {to}"),
        Event::CountdownExpired { .. } => "time's up!".to_string(),
        Event::Snapshot {
            mode,
            running,
            display,
            ..
        } => {
            let state = if *running { "running" } else { "idle" };
            format!("{display} ({mode}, {state})")
        }
    }
}

fn initial_countdown(args: &RunArgs, config: &Config) -> CountdownInput {
    if args.minutes.is_some() || args.seconds.is_some() {
        CountdownInput::parse(
            args.minutes.as_deref().unwrap_or(""),
            args.seconds.as_deref().unwrap_or(""),
        )
    } else {
        config.countdown_input()
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_loop(args, config));
    // A pending stdin read would otherwise hold the runtime open after Ctrl+C.
    runtime.shutdown_background();
    result
}

async fn run_loop(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mode = args.mode.unwrap_or(config.start_mode);
    let prefill = initial_countdown(&args, &config);

    let mut session = Session::with_tracker(TimeTracker::with_mode(mode), SystemClock);
    if mode == TrackerMode::CountDown {
        session.set_countdown(prefill);
    }
    let session = Arc::new(Mutex::new(session));

    let printer = Printer {
        json: args.json,
        bell: config.notifications.bell,
        render: config.display.render && !args.no_render && std::io::stdout().is_terminal(),
    };
    tracing::debug!(%mode, render = printer.render, "session started");

    let ticker = {
        let session = Arc::clone(&session);
        Ticker::spawn(config.tick_interval(), move || {
            let tick = match session.lock() {
                Ok(mut session) => session.tick(),
                Err(_) => return TickControl::Stop,
            };
            printer.events(&tick.events);
            printer.render(&tick.display);
            TickControl::Continue
        })?
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cmd = match line.parse::<InputCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };
        if cmd == InputCommand::Quit {
            break;
        }

        let result = {
            let mut session = session.lock().map_err(|_| "session state poisoned")?;
            let result = cmd.apply(&mut *session);
            if cmd == InputCommand::Mode(TrackerMode::CountDown) {
                session.set_countdown(prefill);
            }
            result
        };
        match result {
            Ok(events) => printer.events(&events),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    ticker.cancel().await;

    let snapshot = session
        .lock()
        .map_err(|_| "session state poisoned")?
        .snapshot();
    printer.event(&snapshot);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn describes_events_for_humans() {
        let at = Utc::now();
        assert_eq!(
            describe(&Event::TrackerStarted {
                mode: TrackerMode::CountDown,
                from_ms: 90_000,
                at
            }),
            "started countdown at 01:30.000"
        );
        assert_eq!(
            describe(&Event::Snapshot {
                mode: TrackerMode::CountUp,
                running: false,
                value_ms: 1_500,
                display: "00:01.500".into(),
                at
            }),
            "00:01.500 (countup, idle)"
        );
        assert_eq!(describe(&Event::CountdownExpired { at }), "time's up!");
    }

    #[test]
    fn event_lines_clear_the_read_out_when_rendering() {
        let at = Utc::now();
        let event = Event::TrackerReset {
            mode: TrackerMode::CountUp,
            at,
        };
        let rendering = Printer {
            json: false,
            bell: true,
            render: true,
        };
        assert_eq!(rendering.event_line(&event).unwrap(), "\r\x1b[2Kreset");

        let piped = Printer {
            render: false,
            ..rendering
        };
        assert_eq!(piped.event_line(&event).unwrap(), "reset");

        let json = Printer { json: true, ..piped };
        let line = json.event_line(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "TrackerReset");
    }

    #[test]
    fn flags_override_configured_countdown() {
        let mut config = Config::default();
        config.countdown.minutes = 5;
        let args = RunArgs {
            mode: None,
            minutes: None,
            seconds: Some("20".into()),
            json: false,
            no_render: false,
        };
        assert_eq!(initial_countdown(&args, &config), CountdownInput::new(0, 20));

        let args = RunArgs { seconds: None, ..args };
        assert_eq!(initial_countdown(&args, &config), CountdownInput::new(5, 0));
    }
}
