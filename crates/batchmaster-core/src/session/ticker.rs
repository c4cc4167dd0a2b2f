//! Background timer tick.

use std::{sync::Arc, time::Duration};

use log::debug;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use super::CookingSession;

/// Cadence of the background tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the ticker task. Dropping the handle stops it.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stops the ticker now.
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl CookingSession {
    /// Runs [`CookingSession::tick`] every second.
    pub fn spawn_ticker(&self) -> TickerHandle {
        self.spawn_ticker_every(TICK_INTERVAL)
    }

    /// Same as [`CookingSession::spawn_ticker`] with a custom period.
    ///
    /// The task only holds a weak reference and ends once every session
    /// handle is dropped.
    pub fn spawn_ticker_every(&self, period: Duration) -> TickerHandle {
        let session = Arc::downgrade(&self.inner);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let Some(inner) = session.upgrade() else {
                    debug!("Session dropped, stopping ticker");
                    break;
                };
                CookingSession { inner }.tick().await;
            }
        });

        TickerHandle { task }
    }
}
