//! GitHub release metadata and archive transport.
//!
//! The engine consumes the remote side through the [`ReleaseProvider`]
//! capability: two read-only, idempotent metadata queries plus a plain GET
//! of the release zipball. [`GitHubClient`] is the production
//! implementation against the GitHub REST API; tests substitute their own
//! provider at this boundary.

use serde::Deserialize;
use tracing::debug;

use crate::constants::GITHUB_API_BASE;
use crate::core::error::RemoteError;

/// A published release as reported by the release host.
///
/// Both fields are nullable in the REST payload; the engine decides what a
/// missing value means for the stage that needed it.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Tag naming the release (e.g. `"v1.4.0"`). Opaque to the engine.
    pub tag_name: Option<String>,
    /// URL of the source zipball for this release.
    pub zipball_url: Option<String>,
}

/// Read-only capability the synchronization engine consumes.
///
/// Implementations must not retry internally; the engine makes exactly one
/// attempt per stage and bounds each with its own timeout.
#[allow(async_fn_in_trait)]
pub trait ReleaseProvider {
    /// The most recently published release of `owner/repo`.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, RemoteError>;

    /// The release published under `tag`, if any.
    async fn release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, RemoteError>;

    /// All bytes of the archive at `url`. Expects a 200 response.
    async fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

/// [`ReleaseProvider`] backed by the GitHub REST API.
///
/// Requests are unauthenticated; public repositories are the intended
/// source. GitHub requires a user agent, so one is derived from the crate
/// version.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
}

impl GitHubClient {
    /// Construct a client with the default HTTP stack.
    pub fn new() -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("relsync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn get_release(&self, url: &str) -> Result<Release, RemoteError> {
        debug!(url, "querying release metadata");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status { status, url: url.to_string() });
        }
        Ok(response.json().await?)
    }
}

impl ReleaseProvider for GitHubClient {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, RemoteError> {
        let url = format!("{GITHUB_API_BASE}/repos/{owner}/{repo}/releases/latest");
        self.get_release(&url).await
    }

    async fn release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, RemoteError> {
        let url = format!("{GITHUB_API_BASE}/repos/{owner}/{repo}/releases/tags/{tag}");
        self.get_release(&url).await
    }

    async fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        debug!(url, "downloading release archive");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status { status, url: url.to_string() });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
