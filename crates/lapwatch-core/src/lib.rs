//! # lapwatch Core Library
//!
//! Business logic for the lapwatch stopwatch/countdown. Front-ends (the
//! `lapwatch` CLI today) own a [`Session`] and forward user commands to it;
//! all time bookkeeping lives here.
//!
//! ## Architecture
//!
//! - **Time Tracker**: a wall-clock-based state machine with two modes
//!   (count-up and countdown). It never reads a clock; callers pass `now`.
//! - **Ticker**: a cancellable periodic callback on the tokio runtime,
//!   independent of the tracker.
//! - **Session**: tracker plus clock; its `tick()` is the callback body and
//!   handles countdown expiry through the tracker's public operations.
//! - **Storage**: TOML-based configuration.
//! - **Calc**: keypad calculator with date and time-difference helpers,
//!   unrelated to the tracker.
//!
//! ## Key Components
//!
//! - [`TimeTracker`]: Core state machine
//! - [`Session`]: Tick-driven driver
//! - [`Ticker`]: Periodic tick source
//! - [`Config`]: Application configuration management
//! - [`Calculator`]: Chained-operator keypad arithmetic

pub mod calc;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod session;
pub mod storage;
pub mod ticker;
pub mod tracker;

pub use calc::{Calculator, Key};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CalcError, ConfigError, CoreError, TickerError, TrackerError};
pub use events::Event;
pub use format::format_duration;
pub use session::{Session, Tick};
pub use storage::Config;
pub use ticker::{TickControl, Ticker};
pub use tracker::{CountdownInput, TimeTracker, TrackerMode};
