use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::info;

use crate::reconciler::StatusReconciler;

pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub struct PollingTask;

impl PollingTask {
    /// First tick fires one full period after start. Every tick runs as its
    /// own task, so a slow fetch never delays the next one.
    pub fn start(reconciler: Arc<StatusReconciler>, period: Duration) -> PollingHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period = ?period, "poll: started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let reconciler = Arc::clone(&reconciler);
                        tokio::spawn(async move {
                            reconciler.tick().await;
                        });
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("poll: stopped");
        });
        PollingHandle { shutdown, task }
    }
}

/// Dropping the handle also stops the schedule. Ticks already in flight are
/// allowed to finish.
pub struct PollingHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollingHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
#[path = "tests/polling_tests.rs"]
mod tests;
