//! Periodic tick source.
//!
//! A [`Ticker`] calls a closure at a fixed period on the tokio runtime until
//! the closure asks to stop, the ticker is cancelled, or the handle is dropped.
//! It knows nothing about trackers; the closure decides what a tick means.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::TickerError;

/// Returned by the tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Handle to a running periodic callback.
pub struct Ticker {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a ticker. The first tick fires immediately.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`TickerError::ZeroPeriod`] if `period` is zero.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Result<Self, TickerError>
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        if period.is_zero() {
            return Err(TickerError::ZeroPeriod);
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A stalled renderer should not burst-fire to catch up.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = interval.tick() => {
                        if on_tick() == TickControl::Stop {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(period_ms = period.as_millis() as u64, "ticker finished");
        });

        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// True once the callback returned [`TickControl::Stop`] or the ticker was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop ticking and wait for the in-flight tick, if any, to finish.
    pub async fn cancel(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
