use serde::{Deserialize, Serialize};

/// Countdown length as the user typed it.
///
/// Seconds are not limited to 0..60; `0 min 90 s` is a minute and a half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownInput {
    pub minutes: u64,
    pub seconds: u64,
}

impl CountdownInput {
    pub fn new(minutes: u64, seconds: u64) -> Self {
        Self { minutes, seconds }
    }

    /// Parse the raw contents of the minutes and seconds fields.
    ///
    /// Each field uses its leading run of digits; blank, negative or
    /// non-numeric text counts as 0. Never fails.
    pub fn parse(minutes: &str, seconds: &str) -> Self {
        Self {
            minutes: parse_leading_uint(minutes),
            seconds: parse_leading_uint(seconds),
        }
    }

    /// Total length in milliseconds, saturating on overflow.
    pub fn total_ms(&self) -> u64 {
        self.minutes
            .saturating_mul(60)
            .saturating_add(self.seconds)
            .saturating_mul(1000)
    }

    pub fn is_zero(&self) -> bool {
        self.total_ms() == 0
    }
}

pub(crate) fn parse_leading_uint(raw: &str) -> u64 {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return 0;
    }
    // Only overflow can fail here.
    digits.parse().unwrap_or(u64::MAX)
}
