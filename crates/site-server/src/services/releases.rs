//! Release catalogue.
//!
//! [`Releases`] is the lookup contract the downloads pages consume.
//! [`ManifestReleases`] backs it with a JSON manifest on disk, kept in memory
//! and periodically reloaded by the manifest refresh worker.
//!
//! Manifest schema:
//! ```json
//! { "releases": [ { "branch": "releases", "version": "v0.4.5", "git_hash": "...", ... } ] }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

// ─── Types ───────────────────────────────────────────────────

/// A downloadable build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub branch: String,
    /// Tag name, only set for tagged releases.
    #[serde(default)]
    pub version: Option<String>,
    pub git_hash: String,
    pub git_hash_short: String,
    pub published_at: DateTime<Utc>,
    pub short_title: String,
    pub long_title: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// True if `identifier` names this release by tag, short hash or full hash.
    pub fn matches(&self, identifier: &str) -> bool {
        self.version.as_deref() == Some(identifier)
            || self.git_hash_short == identifier
            || self.git_hash == identifier
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("release manifest has not been loaded")]
    Unavailable,

    #[error("cannot read release manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse release manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Release lookups used by the downloads pages.
///
/// `Ok(None)` means nothing matched; `Err` means the lookup itself failed.
pub trait Releases: Send + Sync + 'static {
    /// Most recently published release on `branch`.
    fn last_by_branch(
        &self,
        branch: &str,
    ) -> impl Future<Output = Result<Option<Release>, ReleaseError>> + Send;

    /// Release on `branch` whose tag or commit hash equals `version`.
    fn by_branch_version(
        &self,
        branch: &str,
        version: &str,
    ) -> impl Future<Output = Result<Option<Release>, ReleaseError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ReleaseManifest {
    releases: Vec<Release>,
}

// ─── Manifest catalogue ──────────────────────────────────────

/// In-memory release catalogue loaded from a JSON manifest.
pub struct ManifestReleases {
    path: PathBuf,
    snapshot: RwLock<Option<Vec<Release>>>,
}

impl ManifestReleases {
    /// Create an empty catalogue. Lookups fail until [`reload`](Self::reload) succeeds.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            snapshot: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the manifest from disk and swap it in.
    ///
    /// On error the previous snapshot stays in place. Returns the number of
    /// releases now loaded.
    pub async fn reload(&self) -> Result<usize, ReleaseError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ReleaseError::Io {
                path: self.path.clone(),
                source,
            })?;

        let manifest: ReleaseManifest =
            serde_json::from_str(&data).map_err(|source| ReleaseError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let count = manifest.releases.len();
        self.replace(manifest.releases).await;
        Ok(count)
    }

    async fn replace(&self, releases: Vec<Release>) {
        *self.snapshot.write().await = Some(releases);
    }
}

impl Releases for ManifestReleases {
    async fn last_by_branch(&self, branch: &str) -> Result<Option<Release>, ReleaseError> {
        let guard = self.snapshot.read().await;
        let releases = guard.as_ref().ok_or(ReleaseError::Unavailable)?;

        Ok(releases
            .iter()
            .filter(|r| r.branch == branch)
            .max_by_key(|r| r.published_at)
            .cloned())
    }

    async fn by_branch_version(
        &self,
        branch: &str,
        version: &str,
    ) -> Result<Option<Release>, ReleaseError> {
        let guard = self.snapshot.read().await;
        let releases = guard.as_ref().ok_or(ReleaseError::Unavailable)?;

        Ok(releases
            .iter()
            .find(|r| r.branch == branch && r.matches(version))
            .cloned())
    }
}
