//! Eviction Sweep Task
//!
//! Background task that periodically removes expired cache entries. The
//! task stops cooperatively through its `SweepHandle`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::error::{Result, VfsError};

/// A cache that can drop its expired entries.
#[async_trait]
pub trait Sweep: Send + Sync {
    /// Label used in log lines.
    fn name(&self) -> &'static str;

    /// Removes expired entries, returning how many were removed.
    async fn sweep_expired(&self) -> usize;
}

// == Sweep Handle ==
/// Owns a running sweep task.
#[derive(Debug)]
pub struct SweepHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = (&mut self.task).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        // A dropped handle never leaves a sweeper running
        if !self.task.is_finished() {
            self.task.abort();
        }
    }
}

/// Spawns a task sweeping `cache` every `interval` until stopped.
///
/// Fails with `Config` for a zero interval.
///
/// # Example
/// ```ignore
/// let data = Arc::new(MemoryDataStore::new(Duration::from_secs(86_400), 1000));
/// let sweeper = spawn_sweep_task(data.clone(), Duration::from_secs(60))?;
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweep_task<S>(cache: Arc<S>, interval: Duration) -> Result<SweepHandle>
where
    S: Sweep + ?Sized + 'static,
{
    if interval.is_zero() {
        return Err(VfsError::Config(format!(
            "{} sweep interval must be positive",
            cache.name()
        )));
    }

    let (stop_tx, mut stop_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        info!(
            "Starting {} sweep task with interval of {:?}",
            cache.name(),
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = ticker.tick() => {
                    let removed = cache.sweep_expired().await;
                    if removed > 0 {
                        info!("{} sweep: removed {} expired entries", cache.name(), removed);
                    } else {
                        debug!("{} sweep: no expired entries found", cache.name());
                    }
                }
            }
        }

        info!("{} sweep task stopped", cache.name());
    });

    Ok(SweepHandle {
        stop: Some(stop_tx),
        task,
    })
}
