use std::fmt;

use crate::error::CalcError;
use crate::tracker::parse_leading_uint;

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Hours and minutes as typed. Neither field is range-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u64,
    pub minutes: u64,
}

impl ClockTime {
    pub fn new(hours: u64, minutes: u64) -> Self {
        Self { hours, minutes }
    }

    /// Parse `H:MM`. Each field uses its leading digits and counts as 0 otherwise.
    pub fn parse(raw: &str) -> Self {
        let (hours, minutes) = raw.split_once(':').unwrap_or((raw, ""));
        Self::new(parse_leading_uint(hours), parse_leading_uint(minutes))
    }

    pub fn total_minutes(&self) -> u64 {
        self.hours.saturating_mul(60).saturating_add(self.minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Time from `start` to `end`. An `end` before `start` is on the next day.
///
/// # Errors
///
/// [`CalcError::NegativeDuration`] if `end` is more than a day before `start`.
pub fn time_difference(start: ClockTime, end: ClockTime) -> Result<ClockTime, CalcError> {
    let start = start.total_minutes();
    let mut end = end.total_minutes();
    if end < start {
        end = end.saturating_add(MINUTES_PER_DAY);
    }
    let diff = end
        .checked_sub(start)
        .ok_or(CalcError::NegativeDuration)?;
    Ok(ClockTime::new(diff / 60, diff % 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(start: &str, end: &str) -> Result<String, CalcError> {
        time_difference(ClockTime::parse(start), ClockTime::parse(end)).map(|t| t.to_string())
    }

    #[test]
    fn same_day_difference() {
        assert_eq!(diff("09:30", "17:45").unwrap(), "08:15");
        assert_eq!(diff("10:00", "10:00").unwrap(), "00:00");
    }

    #[test]
    fn wraps_past_midnight() {
        assert_eq!(diff("22:00", "01:30").unwrap(), "03:30");
        assert_eq!(diff("23:59", "00:00").unwrap(), "00:01");
    }

    #[test]
    fn blank_fields_are_zero() {
        assert_eq!(ClockTime::parse("7"), ClockTime::new(7, 0));
        assert_eq!(ClockTime::parse(":15"), ClockTime::new(0, 15));
        assert_eq!(diff("", "2:5").unwrap(), "02:05");
    }

    #[test]
    fn unchecked_fields_can_exceed_a_day() {
        assert_eq!(diff("0:00", "30:00").unwrap(), "30:00");
        assert_eq!(diff("50:00", "00:00"), Err(CalcError::NegativeDuration));
    }
}
