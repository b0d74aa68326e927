use chrono::{Days, NaiveDate};

use crate::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOp {
    Add,
    Subtract,
}

/// Parse a `YYYY-MM-DD` base date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CalcError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CalcError::InvalidDate(raw.to_string()))
}

/// Parse a day count from its leading integer, e.g. `"7 days"` is 7.
pub fn parse_days(raw: &str) -> Result<i64, CalcError> {
    let s = raw.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let magnitude: i64 = unsigned[..end]
        .parse()
        .map_err(|_| CalcError::InvalidDays(raw.to_string()))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Move `base` by `days` in the direction of `op`.
///
/// With `count_start_day` the base date itself counts as day one, so
/// adding moves one day less and subtracting one day more.
pub fn shift_date(
    base: NaiveDate,
    op: DateOp,
    days: i64,
    count_start_day: bool,
) -> Result<NaiveDate, CalcError> {
    let adjust = i64::from(count_start_day);
    let delta = match op {
        DateOp::Add => days.checked_sub(adjust),
        DateOp::Subtract => days.checked_add(adjust).and_then(i64::checked_neg),
    }
    .ok_or(CalcError::DateOutOfRange)?;

    let shifted = if delta >= 0 {
        base.checked_add_days(Days::new(delta.unsigned_abs()))
    } else {
        base.checked_sub_days(Days::new(delta.unsigned_abs()))
    };
    shifted.ok_or(CalcError::DateOutOfRange)
}
