//! Timer definition refresh background task

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::model::Timer;

/// Background task that polls the remote definition and publishes snapshots
///
/// Fetch failures are logged and retried on the next tick; the watchers keep
/// rendering from the last good snapshot in the meantime. The task ends when
/// every receiver is gone.
pub async fn refresh_task(
    client: ApiClient,
    id: String,
    refresh_seconds: u64,
    updates_tx: watch::Sender<Timer>,
) {
    info!(
        "Starting refresh task for timer '{}' (every {}s)",
        id, refresh_seconds
    );

    let mut interval = interval(Duration::from_secs(refresh_seconds));

    loop {
        interval.tick().await;

        match client.get_timer(&id).await {
            Ok(timer) => {
                debug!("Refreshed timer '{}'", id);
                if updates_tx.send(timer).is_err() {
                    info!("All watchers gone, stopping refresh task");
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to refresh timer '{}': {}", id, e);
            }
        }
    }
}
