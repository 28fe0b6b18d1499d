//! Background Refresher
//!
//! Keeps slow-changing catalog data warm. Runs one cycle at startup and then
//! on a fixed interval until shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::readthrough::ReadThrough;
use crate::shutdown::Shutdown;

/// Shortest interval the refresher accepts.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Game schemas re-fetched and rewritten
    pub schemas_refreshed: usize,
    /// Tracked users whose owned-games list was re-fetched
    pub users_refreshed: usize,
    /// Individual refreshes that failed
    pub failures: usize,
}

/// Spawns the refresher.
///
/// # Arguments
/// * `read_through` - helper whose cache and upstream are refreshed
/// * `interval` - time between cycles, at least one second; the first cycle runs immediately
/// * `tracked_users` - user IDs whose owned-games lists are re-fetched each cycle
/// * `shutdown` - stops the loop, including between keys of a running cycle
///
/// # Example
/// ```ignore
/// let (trigger, shutdown) = Shutdown::channel();
/// let handle = spawn_refresher(read_through, Duration::from_secs(86_400), vec![], shutdown);
/// // Later, during shutdown:
/// trigger.trigger();
/// handle.await?;
/// ```
pub fn spawn_refresher(
    read_through: Arc<ReadThrough>,
    interval: Duration,
    tracked_users: Vec<String>,
    mut shutdown: Shutdown,
) -> JoinHandle<()> {
    let interval = if interval.is_zero() {
        warn!(
            min_secs = MIN_INTERVAL.as_secs(),
            "Zero refresh interval, using the minimum"
        );
        MIN_INTERVAL
    } else {
        interval
    };

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            tracked_users = tracked_users.len(),
            "Starting cache refresher"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Cache refresher exited");
                    return;
                }
                _ = ticker.tick() => {
                    refresh_cycle(&read_through, &tracked_users, &shutdown).await;
                }
            }
        }
    })
}

/// Runs a single refresh cycle. A failure on one key is logged and the
/// cycle moves on.
pub async fn refresh_cycle(
    read_through: &ReadThrough,
    tracked_users: &[String],
    shutdown: &Shutdown,
) -> RefreshReport {
    let start = Instant::now();
    let mut report = RefreshReport::default();

    match read_through.schemas_in_cache().await {
        Ok(app_ids) => {
            for app_id in app_ids {
                if shutdown.is_cancelled() {
                    return report;
                }
                match read_through.refresh_schema(app_id).await {
                    Ok(_) => report.schemas_refreshed += 1,
                    Err(e) => {
                        report.failures += 1;
                        error!(app_id, error = %e, "Failed to refresh game schema");
                    }
                }
            }
        }
        Err(e) => {
            report.failures += 1;
            error!(error = %e, "Unable to scan cache for game schemas");
        }
    }

    for user_id in tracked_users {
        if shutdown.is_cancelled() {
            return report;
        }
        match refresh_user(read_through, user_id).await {
            Ok(()) => report.users_refreshed += 1,
            Err(e) => {
                report.failures += 1;
                error!(user_id = %user_id, error = %e, "Failed to refresh owned games");
            }
        }
    }

    info!(
        schemas = report.schemas_refreshed,
        users = report.users_refreshed,
        failures = report.failures,
        duration_ms = start.elapsed().as_millis() as u64,
        "Refresh complete"
    );
    report
}

async fn refresh_user(read_through: &ReadThrough, user_id: &str) -> Result<()> {
    read_through.refresh_owned_games(user_id).await?;
    Ok(())
}
