//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;

/// Shortest period the sweep will run at; `interval` rejects zero.
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Spawns a background task that sweeps expired entries out of `cache`.
///
/// Every `period` the task takes the cache's write lock once and removes all
/// entries whose expiry has passed. It stops when `shutdown` carries `true`
/// or when its sender is dropped. A `period` below [`MIN_SWEEP_PERIOD`] is
/// raised to it.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(TtlCache::<String>::new(Duration::from_secs(300)));
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60), shutdown_rx);
/// // Later, during teardown:
/// let _ = shutdown_tx.send(true);
/// handle.await?;
/// ```
pub fn spawn_sweep_task<V>(
    cache: Arc<TtlCache<V>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    if period < MIN_SWEEP_PERIOD {
        warn!(
            requested_ms = period.as_millis() as u64,
            "sweep period too short, using minimum"
        );
    }
    let period = period.max(MIN_SWEEP_PERIOD);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        info!(period_secs = period.as_secs_f64(), "cache sweep task started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("cache sweep task shutting down");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep_expired();
                    if removed > 0 {
                        info!(removed, remaining = cache.len(), "cache sweep removed expired entries");
                    } else {
                        debug!("cache sweep found no expired entries");
                    }
                }
            }
        }
    })
}
