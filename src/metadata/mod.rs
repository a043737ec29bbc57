//! On-disk record of the last synchronized release.
//!
//! The record is a small JSON object with two string fields, `version` and
//! `last_check_at` (an RFC-3339 timestamp), pretty-printed with two-space
//! indentation:
//!
//! ```json
//! {
//!   "version": "v1.4.0",
//!   "last_check_at": "2026-08-07T09:12:44.031Z"
//! }
//! ```
//!
//! An absent or malformed file is treated as "no known version", never as an
//! error; garbled local state must not wedge synchronization. The record is
//! owned exclusively by the [`Synchronizer`](crate::sync::Synchronizer) and
//! rewritten on every completed cycle, including the no-op cycle where only
//! the timestamp advances.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

/// The persisted version record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Tag of the release last confirmed current. Opaque; compared only for
    /// exact equality, never ordered.
    pub version: String,
    /// When the remote was last successfully checked, whether or not a
    /// download happened.
    pub last_check_at: DateTime<Utc>,
}

/// Reads and writes the version record at a fixed location.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, treating a missing or unparsable file as `None`.
    pub async fn load(&self) -> Option<SyncMetadata> {
        let data = fs::read_to_string(&self.path).await.ok()?;
        serde_json::from_str(&data).ok()
    }

    /// The recorded version, or the empty sentinel when no valid record
    /// exists.
    pub async fn load_version(&self) -> String {
        self.load().await.map(|record| record.version).unwrap_or_default()
    }

    /// Persist `version` with the current timestamp, creating the parent
    /// directory as needed.
    pub async fn save(&self, version: &str) -> Result<()> {
        let record = SyncMetadata { version: version.to_string(), last_check_at: Utc::now() };
        let data =
            serde_json::to_string_pretty(&record).context("failed to serialize sync metadata")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create metadata directory {}", parent.display())
            })?;
        }
        fs::write(&self.path, data)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), version, "saved sync metadata");
        Ok(())
    }
}
