//! Downloads pages.
//!
//! Routes (relative to the mount point):
//!   GET /                       index with the latest release and develop build
//!   GET /latest/{branch}        legacy redirect, see `redirects`
//!   GET /master/{branch}        legacy redirect, see `redirects`
//!   GET /{branch}/{identifier}  release page; `identifier` is a tag, hash or `latest`
//!
//! No authentication required.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Serialize;

use crate::api::params::ResolvedRelease;
use crate::api::redirects;
use crate::services::releases::{Release, Releases};
use crate::services::templates::{Renderer, DOWNLOADS_INDEX, DOWNLOADS_VIEW};
use crate::AppState;
use site_common::AppResult;

pub const RELEASES_BRANCH: &str = "releases";
pub const DEVELOP_BRANCH: &str = "develop";

const INDEX_DESCRIPTION: &str =
    "Downloads for the open-source adaption of RollerCoaster Tycoon 2. Free to download.";
const PROJECT_BLURB: &str = "The open-source adaption of RollerCoaster Tycoon 2.";

pub fn router<R: Releases>(state: Arc<AppState<R>>) -> Router {
    let router = Router::new().route("/", get(index::<R>));

    redirects::register(router)
        .route("/{branch}/{identifier}", get(view::<R>))
        .with_state(state)
}

// ─── Types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PageMeta {
    title: String,
    description: String,
    /// Canonical path, including the router's mount point.
    path: String,
}

#[derive(Debug, Serialize)]
struct IndexContext {
    page: PageMeta,
    last_release: ReleaseSlot,
    /// `null` when the develop lookup failed.
    last_develop: Option<Release>,
}

/// A release, or the empty object `{}` shown when the index lookups failed.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ReleaseSlot {
    Release(Release),
    Placeholder {},
}

#[derive(Debug, Serialize)]
struct ViewContext {
    page: PageMeta,
    release: Release,
    latest: bool,
}

// ─── Handlers ────────────────────────────────────────────────

pub(super) async fn index<R: Releases>(
    State(state): State<Arc<AppState<R>>>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Html<String>> {
    // develop is looked up even when the releases lookup fails, but any
    // failure replaces the release card with the placeholder.
    let last_release = latest_on_branch(&state.releases, RELEASES_BRANCH).await;
    let last_develop = latest_on_branch(&state.releases, DEVELOP_BRANCH).await;

    let last_release = match (last_release, &last_develop) {
        (Some(release), Some(_)) => ReleaseSlot::Release(release),
        _ => ReleaseSlot::Placeholder {},
    };

    let context = IndexContext {
        page: PageMeta {
            title: "Downloads".to_string(),
            description: INDEX_DESCRIPTION.to_string(),
            path: uri.path().to_string(),
        },
        last_release,
        last_develop,
    };

    render(&*state.templates, DOWNLOADS_INDEX, &context)
}

async fn view<R: Releases>(
    State(state): State<Arc<AppState<R>>>,
    OriginalUri(uri): OriginalUri,
    ResolvedRelease { release, latest }: ResolvedRelease,
) -> AppResult<Html<String>> {
    let project = &state.config.site.name;
    let (title, description) = if latest {
        (
            format!("Latest {} download", release.short_title),
            format!(
                "Download latest {} {} of the {} project. {}",
                project, release.long_title, project, PROJECT_BLURB
            ),
        )
    } else {
        (
            format!("Download {}", release.short_title),
            format!(
                "Download {} {} of the {} project. {}",
                project, release.long_title, project, PROJECT_BLURB
            ),
        )
    };

    let context = ViewContext {
        page: PageMeta {
            title,
            description,
            path: uri.path().to_string(),
        },
        release,
        latest,
    };

    render(&*state.templates, DOWNLOADS_VIEW, &context)
}

async fn latest_on_branch<R: Releases>(releases: &R, branch: &str) -> Option<Release> {
    match releases.last_by_branch(branch).await {
        Ok(Some(release)) => Some(release),
        Ok(None) => {
            tracing::warn!(branch, "No release published on branch");
            None
        }
        Err(e) => {
            tracing::warn!(branch, "Failed to look up latest release: {}", e);
            None
        }
    }
}

fn render<T: Serialize>(
    templates: &dyn Renderer,
    name: &str,
    context: &T,
) -> AppResult<Html<String>> {
    let context = serde_json::to_value(context).map_err(anyhow::Error::from)?;
    let html = templates.render(name, &context)?;
    Ok(Html(html))
}
