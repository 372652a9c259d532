//! Release manifest refresh — picks up newly published builds.
//!
//! Re-reads the manifest every `releases.refresh_interval_secs`. A manifest
//! that fails to read or parse is logged and the previous catalogue is kept.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::services::releases::ManifestReleases;
use crate::AppState;

pub fn start(state: Arc<AppState<ManifestReleases>>, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; startup already loaded the manifest.
        interval.tick().await;

        tracing::info!(
            path = %state.releases.path().display(),
            "Manifest refresh worker started (every {}s)",
            interval_secs
        );

        loop {
            interval.tick().await;

            match state.releases.reload().await {
                Ok(count) => tracing::debug!(count, "Release manifest reloaded"),
                Err(e) => tracing::warn!("Release manifest reload failed: {}", e),
            }
        }
    })
}
