//! HTTP routes module.

pub mod downloads;
mod health;
pub mod params;
pub mod redirects;

use crate::services::releases::Releases;
use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Build the site router: the downloads pages under the configured prefix
/// plus the health check.
///
/// The index answers on both `{prefix}` and `{prefix}/`; a nested `/` route
/// only covers the first form.
pub fn router<R: Releases>(state: Arc<AppState<R>>) -> Router {
    let prefix = state.config.server.downloads_prefix.trim_end_matches('/');
    let downloads = downloads::router(state.clone());

    let router = if prefix.is_empty() {
        Router::new().merge(downloads)
    } else {
        let index = Router::new()
            .route(&format!("{}/", prefix), get(downloads::index::<R>))
            .with_state(state.clone());
        Router::new().nest(prefix, downloads).merge(index)
    };

    router.merge(health::router())
}
