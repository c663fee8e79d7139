//! Periodic collection reload.
//!
//! # Responsibility
//! - Call `get_all()` on a fixed period until stopped.
//!
//! # Invariants
//! - The first reload happens one full period after start.
//! - `stop()` is idempotent; dropping the handle stops the task.
//! - Ticks do not coordinate with manual refreshes; last write wins.

use crate::clock::Clock;
use crate::repo::participant_repo::ParticipantRepository;
use crate::storage::KeyValueStore;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default reload period.
pub const DEFAULT_AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to a running periodic reload task.
pub struct AutoRefresh {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    /// Spawns the reload task on the current tokio runtime.
    ///
    /// # Errors
    /// - Returns an error when `period` is zero.
    /// - Returns an error when called outside a tokio runtime.
    pub fn start<S, C>(
        repo: Arc<ParticipantRepository<S, C>>,
        period: Duration,
    ) -> Result<Self, String>
    where
        S: KeyValueStore + Send + Sync + 'static,
        C: Clock + Send + Sync + 'static,
    {
        if period.is_zero() {
            return Err("auto refresh period must be greater than zero".to_string());
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| format!("auto refresh requires a tokio runtime: {err}"))?;

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let snapshot = repo.get_all();
                debug!(
                    "event=auto_refresh_tick module=service status=ok count={}",
                    snapshot.len()
                );
            }
        });

        info!(
            "event=auto_refresh_start module=service status=ok period_ms={}",
            period.as_millis()
        );
        Ok(Self {
            period,
            task: Some(task),
        })
    }

    /// Stops the task. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("event=auto_refresh_stop module=service status=ok");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
