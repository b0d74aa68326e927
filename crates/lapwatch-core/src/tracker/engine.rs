//! Elapsed-time tracker.
//!
//! The tracker is a wall-clock-based state machine over two axes, mode and
//! running. It never reads a clock itself: every operation takes the instant
//! (`now_ms`, milliseconds since the Unix epoch) from the caller, and `read`
//! is a pure query that can be polled at any cadence.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//! any --switch_mode--> (target)·Idle
//! CountDown·Running --(read == 0, observed by the driver)--> CountUp·Idle
//! ```
//!
//! ## Usage
//!
//! ```
//! use lapwatch_core::tracker::TimeTracker;
//!
//! let mut tracker = TimeTracker::new();
//! tracker.start(0).unwrap();
//! tracker.stop(1_000);
//! tracker.start(5_000).unwrap();
//! assert_eq!(tracker.read(5_500), 1_500);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::input::CountdownInput;
use crate::error::TrackerError;
use crate::events::Event;
use crate::format::format_duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerMode {
    /// Stopwatch: counts up from zero.
    #[default]
    CountUp,
    /// Timer: counts down from a configured length.
    CountDown,
}

impl fmt::Display for TrackerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerMode::CountUp => f.write_str("countup"),
            TrackerMode::CountDown => f.write_str("countdown"),
        }
    }
}

impl FromStr for TrackerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "countup" | "up" | "stopwatch" => Ok(TrackerMode::CountUp),
            "countdown" | "down" | "timer" => Ok(TrackerMode::CountDown),
            other => Err(format!("unknown mode '{other}' (expected countup or countdown)")),
        }
    }
}

/// Elapsed/remaining time bookkeeping across start/stop segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTracker {
    mode: TrackerMode,
    /// CountUp: elapsed before the current segment.
    /// CountDown: remaining before the current segment. Can dip below zero
    /// if a countdown is stopped after running out without being observed.
    accumulated_ms: i64,
    /// Start of the current run segment. Present iff running.
    #[serde(default)]
    anchor_epoch_ms: Option<u64>,
    /// Pending countdown length, used to seed `accumulated_ms` on start.
    #[serde(default)]
    configured: Option<CountdownInput>,
}

impl TimeTracker {
    /// CountUp, idle, zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: TrackerMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.anchor_epoch_ms.is_some()
    }

    pub fn accumulated_ms(&self) -> i64 {
        self.accumulated_ms
    }

    pub fn anchor_epoch_ms(&self) -> Option<u64> {
        self.anchor_epoch_ms
    }

    pub fn configured(&self) -> Option<CountdownInput> {
        self.configured
    }

    /// Displayed duration at `now_ms`. Never negative.
    pub fn read(&self, now_ms: u64) -> u64 {
        self.signed_value(now_ms).max(0) as u64
    }

    /// True when a running countdown has reached zero at `now_ms`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.mode == TrackerMode::CountDown
            && self.is_running()
            && self.signed_value(now_ms) <= 0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        let value_ms = self.read(now_ms);
        Event::Snapshot {
            mode: self.mode,
            running: self.is_running(),
            value_ms,
            display: format_duration(value_ms as i64),
            at: timestamp(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record the countdown length the next `start` may seed from.
    ///
    /// Only consulted while the remaining time is zero, so a paused
    /// countdown keeps its remaining time even if the input changes.
    pub fn set_countdown(&mut self, input: CountdownInput) {
        self.configured = Some(input);
    }

    /// Begin a run segment. `Ok(None)` if already running.
    ///
    /// # Errors
    ///
    /// [`TrackerError::InvalidConfiguration`] when a countdown has nothing
    /// left and no usable configured length. No state changes in that case.
    pub fn start(&mut self, now_ms: u64) -> Result<Option<Event>, TrackerError> {
        if self.is_running() {
            return Ok(None);
        }

        if self.mode == TrackerMode::CountDown {
            if self.accumulated_ms <= 0 {
                let seed = self.configured.map(|c| c.total_ms()).unwrap_or(0);
                if seed > 0 {
                    self.accumulated_ms = i64::try_from(seed).unwrap_or(i64::MAX);
                }
            }
            if self.accumulated_ms <= 0 {
                tracing::warn!("countdown start rejected: no duration configured");
                return Err(TrackerError::InvalidConfiguration);
            }
        }

        self.anchor_epoch_ms = Some(now_ms);
        let from_ms = self.read(now_ms);
        tracing::debug!(mode = %self.mode, from_ms, "tracker started");
        Ok(Some(Event::TrackerStarted {
            mode: self.mode,
            from_ms,
            at: timestamp(now_ms),
        }))
    }

    /// Close the current run segment. `None` if not running.
    pub fn stop(&mut self, now_ms: u64) -> Option<Event> {
        let anchor = self.anchor_epoch_ms.take()?;
        let segment_ms = now_ms.saturating_sub(anchor);
        let delta = i64::try_from(segment_ms).unwrap_or(i64::MAX);
        match self.mode {
            TrackerMode::CountUp => {
                self.accumulated_ms = self.accumulated_ms.saturating_add(delta);
            }
            TrackerMode::CountDown => {
                self.accumulated_ms = self.accumulated_ms.saturating_sub(delta);
            }
        }
        let value_ms = self.read(now_ms);
        tracing::debug!(mode = %self.mode, segment_ms, value_ms, "tracker stopped");
        Some(Event::TrackerStopped {
            mode: self.mode,
            segment_ms,
            value_ms,
            at: timestamp(now_ms),
        })
    }

    /// Start if idle, stop if running.
    pub fn toggle(&mut self, now_ms: u64) -> Result<Option<Event>, TrackerError> {
        if self.is_running() {
            Ok(self.stop(now_ms))
        } else {
            self.start(now_ms)
        }
    }

    /// Back to zero in the current mode. Also drops the pending countdown input.
    pub fn reset(&mut self, now_ms: u64) -> Event {
        // The closed segment is overwritten below.
        let _ = self.stop(now_ms);
        self.accumulated_ms = 0;
        self.configured = None;
        tracing::debug!(mode = %self.mode, "tracker reset");
        Event::TrackerReset {
            mode: self.mode,
            at: timestamp(now_ms),
        }
    }

    /// Stop, reset, then change mode. Nothing carries across.
    pub fn switch_mode(&mut self, mode: TrackerMode, now_ms: u64) -> Event {
        let _ = self.stop(now_ms);
        let _ = self.reset(now_ms);
        let from = self.mode;
        self.mode = mode;
        tracing::debug!(%from, to = %mode, "tracker mode switched");
        Event::ModeSwitched {
            from,
            to: mode,
            at: timestamp(now_ms),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn signed_value(&self, now_ms: u64) -> i64 {
        let delta = self
            .anchor_epoch_ms
            .map(|anchor| i64::try_from(now_ms.saturating_sub(anchor)).unwrap_or(i64::MAX))
            .unwrap_or(0);
        match self.mode {
            TrackerMode::CountUp => self.accumulated_ms.saturating_add(delta),
            TrackerMode::CountDown => self.accumulated_ms.saturating_sub(delta),
        }
    }
}

pub(crate) fn timestamp(now_ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(i64::try_from(now_ms).unwrap_or(i64::MAX)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(minutes: u64, seconds: u64) -> TimeTracker {
        let mut tracker = TimeTracker::with_mode(TrackerMode::CountDown);
        tracker.set_countdown(CountdownInput::new(minutes, seconds));
        tracker
    }

    #[test]
    fn starts_idle_in_count_up() {
        let tracker = TimeTracker::new();
        assert_eq!(tracker.mode(), TrackerMode::CountUp);
        assert!(!tracker.is_running());
        assert_eq!(tracker.read(123), 0);
    }

    #[test]
    fn single_segment_count_up() {
        let mut tracker = TimeTracker::new();
        tracker.start(10_000).unwrap();
        assert_eq!(tracker.read(12_500), 2_500);
        tracker.stop(13_000);
        assert_eq!(tracker.read(99_999), 3_000);
    }

    #[test]
    fn multi_segment_accumulates() {
        let mut tracker = TimeTracker::new();
        tracker.start(0).unwrap();
        tracker.stop(1_000);
        tracker.start(4_000).unwrap();
        tracker.stop(4_500);
        assert_eq!(tracker.read(10_000), 1_500);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut tracker = TimeTracker::new();
        assert!(tracker.start(0).unwrap().is_some());
        assert!(tracker.start(500).unwrap().is_none());
        assert_eq!(tracker.anchor_epoch_ms(), Some(0));
    }

    #[test]
    fn double_stop_is_same_as_one() {
        let mut tracker = TimeTracker::new();
        tracker.start(0).unwrap();
        assert!(tracker.stop(700).is_some());
        let after_first = tracker.clone();
        assert!(tracker.stop(900).is_none());
        assert_eq!(tracker, after_first);
    }

    #[test]
    fn reset_zeroes_in_any_state() {
        let mut running = TimeTracker::new();
        running.start(0).unwrap();
        running.reset(5_000);
        assert!(!running.is_running());
        assert_eq!(running.read(9_000), 0);

        let mut paused = countdown(1, 0);
        paused.start(0).unwrap();
        paused.stop(10_000);
        paused.reset(10_000);
        assert_eq!(paused.mode(), TrackerMode::CountDown);
        assert_eq!(paused.read(10_000), 0);
        assert!(paused.configured().is_none());
    }

    #[test]
    fn switch_mode_always_lands_idle_at_zero() {
        let mut tracker = TimeTracker::new();
        tracker.start(0).unwrap();
        let event = tracker.switch_mode(TrackerMode::CountDown, 2_000);
        assert!(matches!(
            event,
            Event::ModeSwitched { from: TrackerMode::CountUp, to: TrackerMode::CountDown, .. }
        ));
        assert!(!tracker.is_running());
        assert_eq!(tracker.read(3_000), 0);
        assert_eq!(tracker.accumulated_ms(), 0);

        tracker.switch_mode(TrackerMode::CountDown, 3_000);
        assert_eq!(tracker.mode(), TrackerMode::CountDown);
        assert_eq!(tracker.read(3_000), 0);
    }

    #[test]
    fn countdown_seeds_from_configured_input() {
        let mut tracker = countdown(0, 5);
        tracker.start(1_000).unwrap();
        assert_eq!(tracker.read(1_000), 5_000);
        assert_eq!(tracker.read(3_000), 3_000);
        assert!(!tracker.is_expired(5_999));
        assert!(tracker.is_expired(6_000));
        assert_eq!(tracker.read(8_000), 0);
    }

    #[test]
    fn countdown_without_duration_fails_and_changes_nothing() {
        let mut tracker = TimeTracker::with_mode(TrackerMode::CountDown);
        let before = tracker.clone();
        assert_eq!(tracker.start(0), Err(TrackerError::InvalidConfiguration));
        assert_eq!(tracker, before);

        tracker.set_countdown(CountdownInput::new(0, 0));
        assert_eq!(tracker.start(0), Err(TrackerError::InvalidConfiguration));
        assert!(!tracker.is_running());
        assert_eq!(tracker.accumulated_ms(), 0);
    }

    #[test]
    fn paused_countdown_ignores_new_input() {
        let mut tracker = countdown(0, 10);
        tracker.start(0).unwrap();
        tracker.stop(4_000);
        tracker.set_countdown(CountdownInput::new(5, 0));
        tracker.start(4_000).unwrap();
        assert_eq!(tracker.read(4_000), 6_000);
    }

    #[test]
    fn late_stop_clamps_countdown_read() {
        let mut tracker = countdown(0, 1);
        tracker.start(0).unwrap();
        tracker.stop(1_500);
        assert_eq!(tracker.accumulated_ms(), -500);
        assert_eq!(tracker.read(1_500), 0);
        // Re-seeds because nothing is left.
        tracker.start(2_000).unwrap();
        assert_eq!(tracker.read(2_000), 1_000);
    }

    #[test]
    fn count_up_never_expires() {
        let mut tracker = TimeTracker::new();
        tracker.start(0).unwrap();
        assert!(!tracker.is_expired(u64::MAX));
    }

    #[test]
    fn clock_going_backwards_reads_zero_delta() {
        let mut tracker = TimeTracker::new();
        tracker.start(10_000).unwrap();
        assert_eq!(tracker.read(9_000), 0);
        tracker.stop(9_000);
        assert_eq!(tracker.accumulated_ms(), 0);
    }

    #[test]
    fn toggle_alternates() {
        let mut tracker = TimeTracker::new();
        assert!(matches!(tracker.toggle(0), Ok(Some(Event::TrackerStarted { .. }))));
        assert!(matches!(tracker.toggle(250), Ok(Some(Event::TrackerStopped { segment_ms: 250, .. }))));
        assert!(!tracker.is_running());
    }

    #[test]
    fn snapshot_reports_display() {
        let mut tracker = TimeTracker::new();
        tracker.start(0).unwrap();
        match tracker.snapshot(61_234) {
            Event::Snapshot {
                mode,
                running,
                value_ms,
                display,
                ..
            } => {
                assert_eq!(mode, TrackerMode::CountUp);
                assert!(running);
                assert_eq!(value_ms, 61_234);
                assert_eq!(display, "01:01.234");
            }
            other => panic!("Expected Snapshot, got {other:?}"),
        }
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("Stopwatch".parse::<TrackerMode>(), Ok(TrackerMode::CountUp));
        assert_eq!("down".parse::<TrackerMode>(), Ok(TrackerMode::CountDown));
        assert!("sideways".parse::<TrackerMode>().is_err());
    }
}
