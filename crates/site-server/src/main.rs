//! # Downloads site server
//!
//! Serves the project's downloads pages: the index of current builds, the
//! per-release pages, and redirects for legacy download links.

mod api;
mod services;
#[cfg(test)]
mod test_support;
mod workers;

use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use services::releases::ManifestReleases;
use services::templates::{Renderer, TemplateRegistry};

/// Shared application state available to all handlers.
pub struct AppState<R> {
    /// Release lookups.
    pub releases: R,
    /// Page templates, resolved once at startup.
    pub templates: Arc<dyn Renderer>,
    pub config: site_common::AppConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = site_common::AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting downloads site server...");

    // Load the release catalogue
    let releases = ManifestReleases::new(&config.releases.manifest_path);
    match releases.reload().await {
        Ok(count) => tracing::info!(
            count,
            path = %releases.path().display(),
            "Release manifest loaded"
        ),
        Err(e) => tracing::warn!("Release manifest not loaded, release pages will 404: {}", e),
    }

    // Build shared state
    let state = Arc::new(AppState {
        releases,
        templates: Arc::new(TemplateRegistry::builtin(config.site.clone())),
        config: config.clone(),
    });

    // Start background workers
    let _worker_handles = workers::start_all_workers(state.clone());

    // Build router
    let app = api::router(state.clone())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
