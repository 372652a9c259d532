//! Route parameter validation — Axum `FromRequestParts` extractors.
//!
//! [`ValidBranch`] guards every route with a `{branch}` segment.
//! [`ResolvedRelease`] turns `{branch}/{identifier}` into a release, or a 404.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::services::releases::{Release, Releases};
use crate::AppState;
use site_common::{AppError, AppResult};

/// Longest branch name accepted in a URL.
pub const MAX_BRANCH_LEN: usize = 50;

/// Identifier alias for the most recent release on a branch.
pub const LATEST: &str = "latest";

pub const NOT_AVAILABLE: &str = "Requested download is not available.";

async fn route_params<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> AppResult<HashMap<String, String>> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::Internal(anyhow!("{}", e.body_text())))?;
    Ok(params)
}

fn required(params: &HashMap<String, String>, name: &str) -> AppResult<String> {
    params
        .get(name)
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow!("Route has no `{}` segment", name)))
}

/// Reject branch names over [`MAX_BRANCH_LEN`] characters.
///
/// The failure carries no specific status and surfaces as a generic error.
pub fn check_branch(branch: &str) -> AppResult<()> {
    let len = branch.chars().count();
    if len > MAX_BRANCH_LEN {
        tracing::debug!(len, "Rejected oversized branch parameter");
        return Err(AppError::Internal(anyhow!("Invalid branch.")));
    }
    Ok(())
}

/// The `{branch}` path segment, length-checked.
pub struct ValidBranch(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ValidBranch {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = route_params(parts, state).await?;
        let branch = required(&params, "branch")?;
        check_branch(&branch)?;
        Ok(ValidBranch(branch))
    }
}

/// Release named by the `{branch}/{identifier}` segments.
#[derive(Debug)]
pub struct ResolvedRelease {
    pub release: Release,
    /// Resolved through the `latest` alias rather than an exact identifier.
    pub latest: bool,
}

impl<R: Releases> FromRequestParts<Arc<AppState<R>>> for ResolvedRelease {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<R>>,
    ) -> Result<Self, Self::Rejection> {
        let params = route_params(parts, state).await?;
        let branch = required(&params, "branch")?;
        check_branch(&branch)?;
        let identifier = required(&params, "identifier")?;

        resolve(&state.releases, &branch, &identifier).await
    }
}

/// Look up `identifier` on `branch`. Lookup failures are logged and
/// treated the same as a missing release.
pub async fn resolve<R: Releases>(
    releases: &R,
    branch: &str,
    identifier: &str,
) -> AppResult<ResolvedRelease> {
    let latest = identifier == LATEST;
    let lookup = if latest {
        releases.last_by_branch(branch).await
    } else {
        releases.by_branch_version(branch, identifier).await
    };

    let release = match lookup {
        Ok(release) => release,
        Err(e) => {
            tracing::error!(branch, identifier, "Release lookup failed: {}", e);
            None
        }
    };

    match release {
        Some(release) => Ok(ResolvedRelease { release, latest }),
        None => Err(AppError::NotFound(NOT_AVAILABLE.into())),
    }
}
