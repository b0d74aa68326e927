use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::TrackerMode;

/// Every tracker transition produces an Event.
/// The front-end renders snapshots; notifications hang off the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TrackerStarted {
        mode: TrackerMode,
        /// Elapsed (count-up) or remaining (countdown) time at the start of the segment.
        from_ms: u64,
        at: DateTime<Utc>,
    },
    TrackerStopped {
        mode: TrackerMode,
        /// Length of the run segment that just ended.
        segment_ms: u64,
        /// Displayed value after the stop.
        value_ms: u64,
        at: DateTime<Utc>,
    },
    TrackerReset {
        mode: TrackerMode,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TrackerMode,
        to: TrackerMode,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero while running. Emitted once, before the
    /// automatic return to count-up.
    CountdownExpired {
        at: DateTime<Utc>,
    },
    Snapshot {
        mode: TrackerMode,
        running: bool,
        value_ms: u64,
        display: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TrackerStarted { .. } => "TrackerStarted",
            Event::TrackerStopped { .. } => "TrackerStopped",
            Event::TrackerReset { .. } => "TrackerReset",
            Event::ModeSwitched { .. } => "ModeSwitched",
            Event::CountdownExpired { .. } => "CountdownExpired",
            Event::Snapshot { .. } => "Snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::ModeSwitched {
            from: TrackerMode::CountUp,
            to: TrackerMode::CountDown,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ModeSwitched");
        assert_eq!(json["from"], "countup");
        assert_eq!(json["to"], "countdown");
        assert_eq!(event.kind(), "ModeSwitched");
    }
}
