//! Legacy download links.
//!
//! Each entry maps `/{segment}/{branch}` to a relative rewrite target. The
//! routes are static in their first segment, so the router prefers them over
//! `/{branch}/{identifier}`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::api::params::ValidBranch;
use site_common::url::encode_segment;

/// Placeholder replaced with the captured segment in a rewrite target.
const CAPTURE: &str = "{capture}";

#[derive(Debug)]
pub struct LegacyRedirect {
    /// Literal first path segment.
    pub segment: &'static str,
    /// Relative Location, containing [`CAPTURE`].
    pub target: &'static str,
}

pub const LEGACY_REDIRECTS: &[LegacyRedirect] = &[
    // Some external sites swap the identifier and branch segments.
    LegacyRedirect {
        segment: "latest",
        target: "../{capture}/latest",
    },
    // `master` became `releases`; the capture here is an identifier.
    LegacyRedirect {
        segment: "master",
        target: "../releases/{capture}",
    },
];

impl LegacyRedirect {
    pub fn route(&self) -> String {
        format!("/{}/{{branch}}", self.segment)
    }

    pub fn location(&self, capture: &str) -> String {
        self.target.replace(CAPTURE, &encode_segment(capture))
    }

    fn respond(&self, capture: &str) -> Response {
        let location = self.location(capture);
        tracing::debug!(from = self.segment, %location, "Legacy download link redirected");
        (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
    }
}

/// Add every legacy redirect to `router`.
pub fn register<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    LEGACY_REDIRECTS.iter().fold(router, |router, redirect| {
        router.route(
            &redirect.route(),
            get(move |ValidBranch(capture): ValidBranch| async move {
                redirect.respond(&capture)
            }),
        )
    })
}
