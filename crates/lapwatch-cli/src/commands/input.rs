//! One-line commands understood by `run` (stdin) and `replay` (script lines).

use std::str::FromStr;

use lapwatch_core::{Clock, CountdownInput, Event, Session, TrackerError, TrackerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Start,
    Stop,
    /// Stop if running, start otherwise.
    Toggle,
    Reset,
    Mode(TrackerMode),
    /// Fill the countdown inputs.
    Set(CountdownInput),
    Status,
    /// Run one periodic tick now.
    Tick,
    Quit,
}

impl FromStr for InputCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".into());
        };

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "start" => InputCommand::Start,
            "stop" => InputCommand::Stop,
            "toggle" | "t" => InputCommand::Toggle,
            "reset" | "r" => InputCommand::Reset,
            "mode" => {
                let mode = words
                    .next()
                    .ok_or("usage: mode countup|countdown")?
                    .parse::<TrackerMode>()?;
                InputCommand::Mode(mode)
            }
            "set" => {
                let minutes = words.next().unwrap_or("");
                let seconds = words.next().unwrap_or("");
                InputCommand::Set(CountdownInput::parse(minutes, seconds))
            }
            "status" => InputCommand::Status,
            "tick" => InputCommand::Tick,
            "quit" | "exit" | "q" => InputCommand::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };

        if let Some(extra) = words.next() {
            if !matches!(cmd, InputCommand::Set(_)) {
                return Err(format!("unexpected argument '{extra}'"));
            }
        }
        Ok(cmd)
    }
}

impl InputCommand {
    /// Apply to a session and collect the events it produced.
    ///
    /// `Quit` is a no-op here; the caller decides what it means.
    pub fn apply<C: Clock>(&self, session: &mut Session<C>) -> Result<Vec<Event>, TrackerError> {
        let events = match self {
            InputCommand::Start => session.start()?.into_iter().collect(),
            InputCommand::Stop => session.stop().into_iter().collect(),
            InputCommand::Toggle => session.toggle()?.into_iter().collect(),
            InputCommand::Reset => vec![session.reset()],
            InputCommand::Mode(mode) => vec![session.switch_mode(*mode)],
            InputCommand::Set(input) => {
                session.set_countdown(*input);
                Vec::new()
            }
            InputCommand::Status => vec![session.snapshot()],
            InputCommand::Tick => session.tick().events,
            InputCommand::Quit => Vec::new(),
        };
        Ok(events)
    }
}
