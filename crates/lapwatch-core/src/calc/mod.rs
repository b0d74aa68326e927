//! Calculator: chained-operator keypad arithmetic plus date and
//! time-difference helpers.
//!
//! Independent of the tracker. All state lives in [`Calculator`]; the date
//! and time helpers are pure functions.

mod date;
mod keypad;
mod time_diff;

pub use date::{parse_date, parse_days, shift_date, DateOp};
pub use keypad::{format_with_commas, Calculator, Key, Operator, TAX_RATE};
pub use time_diff::{time_difference, ClockTime};
