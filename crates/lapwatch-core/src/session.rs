//! Tick-driven tracker session.
//!
//! A [`Session`] pairs a [`TimeTracker`] with a [`Clock`] and is what a
//! front-end owns. User commands forward to the tracker at `clock.now_ms()`.
//! [`Session::tick`] is the periodic callback body: it reads the display
//! value and, the first time a running countdown is seen at zero, drives the
//! tracker back to count-up through the same public operations a user has.

use crate::clock::Clock;
use crate::error::TrackerError;
use crate::events::Event;
use crate::format::format_duration;
use crate::tracker::{timestamp, CountdownInput, TimeTracker, TrackerMode};

/// Result of one periodic tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Formatted read-out, `MM:SS.mmm`.
    pub display: String,
    pub value_ms: u64,
    /// Transitions the tick caused. Empty unless the countdown expired.
    pub events: Vec<Event>,
}

impl Tick {
    pub fn expired(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, Event::CountdownExpired { .. }))
    }
}

#[derive(Debug, Clone)]
pub struct Session<C: Clock> {
    tracker: TimeTracker,
    clock: C,
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C) -> Self {
        Self::with_tracker(TimeTracker::new(), clock)
    }

    pub fn with_tracker(tracker: TimeTracker, clock: C) -> Self {
        Self { tracker, clock }
    }

    pub fn tracker(&self) -> &TimeTracker {
        &self.tracker
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn mode(&self) -> TrackerMode {
        self.tracker.mode()
    }

    pub fn is_running(&self) -> bool {
        self.tracker.is_running()
    }

    pub fn read(&self) -> u64 {
        self.tracker.read(self.clock.now_ms())
    }

    pub fn display(&self) -> String {
        format_duration(self.read() as i64)
    }

    pub fn snapshot(&self) -> Event {
        self.tracker.snapshot(self.clock.now_ms())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_countdown(&mut self, input: CountdownInput) {
        self.tracker.set_countdown(input);
    }

    pub fn start(&mut self) -> Result<Option<Event>, TrackerError> {
        self.tracker.start(self.clock.now_ms())
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.tracker.stop(self.clock.now_ms())
    }

    pub fn toggle(&mut self) -> Result<Option<Event>, TrackerError> {
        self.tracker.toggle(self.clock.now_ms())
    }

    pub fn reset(&mut self) -> Event {
        self.tracker.reset(self.clock.now_ms())
    }

    pub fn switch_mode(&mut self, mode: TrackerMode) -> Event {
        self.tracker.switch_mode(mode, self.clock.now_ms())
    }

    /// Periodic callback body.
    ///
    /// On expiry the returned events are, in order: `CountdownExpired`,
    /// `TrackerStopped`, `TrackerReset`, `ModeSwitched`.
    pub fn tick(&mut self) -> Tick {
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        if self.tracker.is_expired(now) {
            tracing::info!("countdown expired");
            events.push(Event::CountdownExpired { at: timestamp(now) });
            events.extend(self.tracker.stop(now));
            events.push(self.tracker.reset(now));
            events.push(self.tracker.switch_mode(TrackerMode::CountUp, now));
        }

        let value_ms = self.tracker.read(now);
        Tick {
            display: format_duration(value_ms as i64),
            value_ms,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session() -> (ManualClock, Session<ManualClock>) {
        let clock = ManualClock::new(1_000_000);
        (clock.clone(), Session::new(clock))
    }

    #[test]
    fn tick_renders_running_value() {
        let (clock, mut session) = session();
        session.start().unwrap();
        clock.advance(61_234);
        let tick = session.tick();
        assert_eq!(tick.display, "01:01.234");
        assert!(tick.events.is_empty());
    }

    #[test]
    fn countdown_expiry_returns_to_count_up_once() {
        let (clock, mut session) = session();
        session.switch_mode(TrackerMode::CountDown);
        session.set_countdown(CountdownInput::new(0, 5));
        session.start().unwrap();

        clock.advance(4_990);
        assert!(!session.tick().expired());

        clock.advance(10);
        let tick = session.tick();
        assert!(tick.expired());
        let kinds: Vec<_> = tick.events.iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            ["CountdownExpired", "TrackerStopped", "TrackerReset", "ModeSwitched"]
        );
        assert_eq!(tick.display, "00:00.000");
        assert_eq!(session.mode(), TrackerMode::CountUp);
        assert!(!session.is_running());

        clock.advance(1_000);
        let again = session.tick();
        assert!(again.events.is_empty());
        assert_eq!(again.value_ms, 0);
    }

    #[test]
    fn late_tick_still_expires_cleanly() {
        let (clock, mut session) = session();
        session.switch_mode(TrackerMode::CountDown);
        session.set_countdown(CountdownInput::new(0, 1));
        session.start().unwrap();
        clock.advance(60_000);
        assert!(session.tick().expired());
        assert_eq!(session.tracker().accumulated_ms(), 0);
        assert!(session.tracker().configured().is_none());
    }

    #[test]
    fn failed_start_is_reported() {
        let (_, mut session) = session();
        session.switch_mode(TrackerMode::CountDown);
        assert_eq!(session.start(), Err(TrackerError::InvalidConfiguration));
        assert!(!session.is_running());
    }
}
