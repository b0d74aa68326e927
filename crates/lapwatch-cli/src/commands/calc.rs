//! Calculator front-end: keypad sequences, date shifts and time differences.

use clap::Subcommand;
use lapwatch_core::calc::{self, ClockTime, DateOp};
use lapwatch_core::{CalcError, Calculator, Key};
use serde_json::json;

#[derive(Subcommand)]
pub enum CalcAction {
    /// Press keys in order and print the display, e.g. `12+3*4=` or `1000 tax-in`
    Eval {
        /// Keys: digits, '.', + - * / (or × ÷ x), =, s, AC, DEL, +/-, tax-in, tax-out
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        keys: Vec<String>,
        /// Print input, display and pending operation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add days to (or subtract from) a date
    Date {
        /// Base date, YYYY-MM-DD
        base: String,
        /// Number of days (leading integer is used)
        #[arg(allow_hyphen_values = true)]
        days: String,
        /// Go back instead of forward
        #[arg(long)]
        subtract: bool,
        /// Count the base date as day one
        #[arg(long)]
        count_start_day: bool,
    },
    /// Time from START to END as HH:MM, wrapping past midnight
    Time {
        /// Start time, H:MM
        start: String,
        /// End time, H:MM
        end: String,
    },
}

/// Turn words into key presses. A word that is not a key label is read
/// one character at a time.
pub fn parse_keys(words: &[String]) -> Result<Vec<Key>, String> {
    let mut keys = Vec::new();
    for word in words {
        if let Some(key) = Key::from_label(word) {
            keys.push(key);
            continue;
        }
        for c in word.chars() {
            let key = Key::from_char(c).ok_or_else(|| format!("unknown key '{c}' in '{word}'"))?;
            keys.push(key);
        }
    }
    Ok(keys)
}

/// Press every key, carrying on past rejected ones the way the keypad does.
pub fn eval(keys: &[Key]) -> (Calculator, Vec<CalcError>) {
    let mut calculator = Calculator::new();
    let mut errors = Vec::new();
    for key in keys {
        if let Err(e) = calculator.press(*key) {
            tracing::debug!(?key, "key rejected: {e}");
            errors.push(e);
        }
    }
    (calculator, errors)
}

pub fn run(action: CalcAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CalcAction::Eval { keys, json } => {
            let keys = parse_keys(&keys)?;
            let (calculator, errors) = eval(&keys);
            for e in &errors {
                eprintln!("error: {e}");
            }
            if json {
                let value = json!({
                    "input": calculator.input(),
                    "display": calculator.display(),
                    "history": calculator.history(),
                });
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{}", calculator.display());
            }
        }
        CalcAction::Date {
            base,
            days,
            subtract,
            count_start_day,
        } => {
            let base = calc::parse_date(&base)?;
            let days = calc::parse_days(&days)?;
            let op = if subtract { DateOp::Subtract } else { DateOp::Add };
            println!("{}", calc::shift_date(base, op, days, count_start_day)?);
        }
        CalcAction::Time { start, end } => {
            let diff = calc::time_difference(ClockTime::parse(&start), ClockTime::parse(&end))?;
            println!("{diff}");
        }
    }
    Ok(())
}
