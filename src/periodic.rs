//! # Periodic Background Tasks
//!
//! Fixed-interval background work with an explicit stop handle. Both the
//! catalog refresher and the session sweeper run on this machinery: one
//! job execution per period, no backoff, shutdown via a watch channel.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Handle to a spawned periodic task.
///
/// The job runs once per period until [`PeriodicTask::stop`] is awaited.
/// The first run happens one full period after spawn; callers that want an
/// immediate run perform it themselves before spawning.
pub struct PeriodicTask {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn a task that awaits `job()` once per `period`.
    pub fn spawn<J, F>(name: &'static str, period: Duration, mut job: J) -> Self
    where
        J: FnMut() -> F + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut stopped) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval yields immediately once; consume that tick so the
            // first job run lands a full period after spawn.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => job().await,
                    _ = stopped.changed() => {
                        debug!(task = name, "Periodic task shutting down");
                        break;
                    }
                }
            }
        });
        info!(task = name, period_secs = period.as_secs(), "Periodic task started");
        Self {
            name,
            shutdown,
            handle,
        }
    }

    /// Signal shutdown and wait for the task to finish. A job already in
    /// flight completes before the task exits.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
        info!(task = self.name, "Periodic task stopped");
    }
}
