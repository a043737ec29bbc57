//! The synchronization engine.
//!
//! A [`Synchronizer`] drives one full cycle per
//! [`synchronize`](Synchronizer::synchronize) call: query the latest
//! release, compare it against the locally recorded version, and - when a
//! refresh is warranted - download the archive, extract it through the
//! configured targets, and record the new version. The version comparison alone is not trusted as a
//! "local copy is present" signal: a destination root that has gone missing
//! or been emptied forces a re-download even when the release tag is
//! unchanged.
//!
//! The metadata record is only written after extraction succeeds, so a
//! failed cycle leaves durable state untouched and the next call retries
//! from the same starting point. The no-op cycle still rewrites the record:
//! the advancing `last_check_at` timestamp is a liveness signal distinct
//! from the version value.
//!
//! Each call makes exactly one remote query attempt and at most one download
//! attempt. Concurrent calls against the same destination roots or metadata
//! file are unspecified; callers serialize.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, METADATA_DIR_NAME};
use crate::core::error::{ConfigError, RemoteError, SyncError};
use crate::extract::{self, ExtractTarget};
use crate::github::ReleaseProvider;
use crate::metadata::MetadataStore;
use crate::router::{ExtractFilter, PathRouter};

/// Outcome of a completed `synchronize` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// A release archive was downloaded and extracted.
    Refreshed {
        /// The release tag now present on disk.
        version: String,
    },
    /// Local state already matched the remote release; only the
    /// last-checked timestamp advanced.
    Current {
        /// The release tag confirmed current.
        version: String,
    },
}

impl SyncStatus {
    /// The release tag this cycle confirmed current.
    pub fn version(&self) -> &str {
        match self {
            Self::Refreshed { version } | Self::Current { version } => version,
        }
    }
}

/// Resolved engine configuration.
///
/// Built through [`SyncConfig::builder`], which fills defaults for unset
/// fields and validates the rest before the engine performs any I/O.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Repository owner (user or organization).
    pub repo_owner: String,
    /// Repository name.
    pub repo_name: String,
    /// Where the version record is read and written.
    pub metadata_path: PathBuf,
    /// Extraction targets; every entry is offered to each one.
    pub targets: Vec<ExtractTarget>,
    /// Coarse predicate applied before routing.
    pub filter: ExtractFilter,
    /// Bound on the latest-release query.
    pub request_timeout: Duration,
    /// Bound on the tag lookup plus archive fetch.
    pub download_timeout: Duration,
}

impl SyncConfig {
    /// Start building a configuration for `owner/repo`.
    pub fn builder(owner: impl Into<String>, repo: impl Into<String>) -> SyncConfigBuilder {
        SyncConfigBuilder {
            repo_owner: owner.into(),
            repo_name: repo.into(),
            metadata_path: None,
            targets: Vec::new(),
            filter: None,
            request_timeout: None,
            download_timeout: None,
        }
    }
}

/// Builder for [`SyncConfig`]; see [`SyncConfig::builder`].
#[derive(Debug)]
pub struct SyncConfigBuilder {
    repo_owner: String,
    repo_name: String,
    metadata_path: Option<PathBuf>,
    targets: Vec<ExtractTarget>,
    filter: Option<ExtractFilter>,
    request_timeout: Option<Duration>,
    download_timeout: Option<Duration>,
}

impl SyncConfigBuilder {
    /// Add an extraction target.
    pub fn target(mut self, router: PathRouter, dest_dir: impl Into<PathBuf>) -> Self {
        self.targets.push(ExtractTarget::new(router, dest_dir));
        self
    }

    /// Override where the version record is kept. Defaults to
    /// `~/.relsync/<owner>-<repo>.json`.
    pub fn metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = Some(path.into());
        self
    }

    /// Set the pre-routing extraction filter. Defaults to accepting
    /// everything.
    pub fn filter(mut self, filter: ExtractFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Bound the latest-release query. Defaults to 3 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Bound the tag lookup plus archive fetch. Defaults to 30 seconds.
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    /// Validate the configuration and fill defaults for unset fields.
    pub fn build(self) -> Result<SyncConfig, ConfigError> {
        if self.repo_owner.is_empty() {
            return Err(ConfigError::MissingOwner);
        }
        if self.repo_name.is_empty() {
            return Err(ConfigError::MissingRepo);
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        for (index, target) in self.targets.iter().enumerate() {
            if target.dest_dir.as_os_str().is_empty() {
                return Err(ConfigError::EmptyDestination { index });
            }
        }

        let metadata_path = match self.metadata_path {
            Some(path) => path,
            None => default_metadata_path(&self.repo_owner, &self.repo_name)?,
        };

        Ok(SyncConfig {
            repo_owner: self.repo_owner,
            repo_name: self.repo_name,
            metadata_path,
            targets: self.targets,
            filter: self.filter.unwrap_or_default(),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            download_timeout: self.download_timeout.unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT),
        })
    }
}

fn default_metadata_path(owner: &str, repo: &str) -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(METADATA_DIR_NAME).join(format!("{owner}-{repo}.json")))
        .ok_or(ConfigError::NoMetadataPath)
}

/// Keeps local directory trees in step with the latest release of a remote
/// repository.
pub struct Synchronizer<P> {
    config: SyncConfig,
    store: MetadataStore,
    provider: P,
}

impl<P: ReleaseProvider> Synchronizer<P> {
    /// Create an engine from a validated configuration and a release
    /// provider.
    pub fn new(config: SyncConfig, provider: P) -> Self {
        let store = MetadataStore::new(config.metadata_path.clone());
        Self { config, store, provider }
    }

    /// The release provider this engine queries.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one full synchronization cycle.
    ///
    /// Returns [`SyncStatus::Current`] when the remote version matched the
    /// local record and every destination root was populated, and
    /// [`SyncStatus::Refreshed`] after a download and extraction. Either way
    /// the metadata record is rewritten so `last_check_at` advances.
    pub async fn synchronize(&self) -> Result<SyncStatus, SyncError> {
        let latest = self.latest_version().await?;
        let local = self.store.load_version().await;
        debug!(remote = %latest, local = %local, "comparing release versions");

        if latest == local && !self.needs_redownload() {
            info!(version = %latest, "local copy is current");
            self.record_version(&latest).await;
            return Ok(SyncStatus::Current { version: latest });
        }

        let archive = self.download_release(&latest).await?;
        extract::extract_archive(&archive, &self.config.targets, &self.config.filter)?;
        info!(version = %latest, targets = self.config.targets.len(), "extracted release archive");

        self.record_version(&latest).await;
        Ok(SyncStatus::Refreshed { version: latest })
    }

    async fn latest_version(&self) -> Result<String, SyncError> {
        let release = timeout(
            self.config.request_timeout,
            self.provider.latest_release(&self.config.repo_owner, &self.config.repo_name),
        )
        .await
        .map_err(|_| SyncError::RemoteUnavailable(RemoteError::Timeout(self.config.request_timeout)))?
        .map_err(SyncError::RemoteUnavailable)?;

        release
            .tag_name
            .filter(|tag| !tag.is_empty())
            .ok_or(SyncError::RemoteUnavailable(RemoteError::MissingIdentifier))
    }

    async fn download_release(&self, version: &str) -> Result<Vec<u8>, SyncError> {
        let fetch = async {
            let release = self
                .provider
                .release_by_tag(&self.config.repo_owner, &self.config.repo_name, version)
                .await?;
            let url = release.zipball_url.ok_or(RemoteError::MissingDownloadUrl)?;
            self.provider.fetch_archive(&url).await
        };

        timeout(self.config.download_timeout, fetch)
            .await
            .map_err(|_| SyncError::DownloadFailed(RemoteError::Timeout(self.config.download_timeout)))?
            .map_err(SyncError::DownloadFailed)
    }

    /// Destination probe backing the repair path: any missing,
    /// non-directory, unreadable, or empty root forces a fresh download even
    /// when the release tag is unchanged.
    fn needs_redownload(&self) -> bool {
        self.config.targets.iter().any(|target| !is_populated_dir(&target.dest_dir))
    }

    async fn record_version(&self, version: &str) {
        // Extraction already succeeded at this point; a write failure here
        // only costs a redundant re-download on the next call.
        if let Err(error) = self.store.save(version).await {
            warn!(%error, "failed to record sync metadata");
        }
    }
}

fn is_populated_dir(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}
