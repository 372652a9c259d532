//! Background workers — periodic tasks running alongside the server.

pub mod manifest_refresh;

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::services::releases::ManifestReleases;
use crate::AppState;

/// Start all background worker tasks. Returns handles that can be
/// used to abort them on shutdown.
pub fn start_all_workers(state: Arc<AppState<ManifestReleases>>) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    let refresh_secs = state.config.releases.refresh_interval_secs;
    if refresh_secs > 0 {
        handles.push(manifest_refresh::start(state, refresh_secs));
    } else {
        tracing::info!("Manifest refresh disabled");
    }

    handles
}
