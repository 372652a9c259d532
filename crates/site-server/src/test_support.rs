//! Shared fixtures for unit tests.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::services::releases::{Release, ReleaseAsset, ReleaseError, Releases};
use crate::services::templates::Renderer;

/// Release published on day `day` of January 2024. `git_hash` must be at
/// least 7 characters.
pub fn release(branch: &str, version: Option<&str>, git_hash: &str, day: u32) -> Release {
    let short = &git_hash[..7];
    Release {
        branch: branch.to_string(),
        version: version.map(str::to_string),
        git_hash: git_hash.to_string(),
        git_hash_short: short.to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        short_title: version.unwrap_or(short).to_string(),
        long_title: match version {
            Some(v) => format!("Release {}", v),
            None => format!("{} build {}", branch, short),
        },
        assets: vec![ReleaseAsset {
            name: format!("OpenRCT2-{}-windows-x64.zip", short),
            url: format!("https://example.org/{}/windows-x64.zip", short),
            size: 20 * 1024 * 1024,
        }],
    }
}

/// In-memory catalogue that records every lookup and can fail per branch.
#[derive(Default)]
pub struct FakeReleases {
    releases: Vec<Release>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeReleases {
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases,
            ..Default::default()
        }
    }

    /// Make every lookup on `branch` fail.
    pub fn failing(mut self, branch: &str) -> Self {
        self.failing.push(branch.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, branch: &str, call: String) -> Result<(), ReleaseError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.iter().any(|b| b == branch) {
            return Err(ReleaseError::Unavailable);
        }
        Ok(())
    }
}

impl Releases for FakeReleases {
    async fn last_by_branch(&self, branch: &str) -> Result<Option<Release>, ReleaseError> {
        self.record(branch, format!("last:{}", branch))?;
        Ok(self
            .releases
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
        self.record(branch, format!("version:{}:{}", branch, version))?;
        Ok(self
            .releases
            .iter()
            .find(|r| r.branch == branch && r.matches(version))
            .cloned())
    }
}

/// Renderer that keeps every (template, context) pair it is asked for.
#[derive(Default)]
pub struct RecordingRenderer {
    rendered: Mutex<Vec<(String, Value)>>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<(String, Value)> {
        self.rendered.lock().unwrap().last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, name: &str, context: &Value) -> anyhow::Result<String> {
        self.rendered
            .lock()
            .unwrap()
            .push((name.to_string(), context.clone()));
        Ok(format!("<html>{}</html>", name))
    }
}
