//! Error handling for relsync.
//!
//! The error surface is split by the stage that can fail:
//!
//! - [`ConfigError`] - invalid construction arguments, returned before any I/O
//! - [`RemoteError`] - transport and API failures talking to the release host
//! - [`ArchiveError`] - extraction-time failures (parse, filesystem, misrouted paths)
//! - [`SyncError`] - per-call failures of the synchronization engine, wrapping
//!   the underlying cause with the failing stage
//!
//! Configuration errors are terminal and reported at construction. Runtime
//! errors abort the current `synchronize` call and leave the on-disk metadata
//! record at its last-known-good value, so the next call retries from the same
//! starting point. No retries or backoff are built in; retry policy belongs to
//! the caller.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Invalid engine construction arguments.
///
/// All variants are fatal and reported before any network or filesystem I/O
/// happens. The builder validates eagerly so a misconfigured engine never
/// reaches its first remote query.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The repository owner was empty.
    #[error("repository owner cannot be empty")]
    MissingOwner,

    /// The repository name was empty.
    #[error("repository name cannot be empty")]
    MissingRepo,

    /// No extraction targets were configured.
    #[error("at least one extraction target is required")]
    NoTargets,

    /// A target was configured with an empty destination directory.
    #[error("target[{index}] destination directory cannot be empty")]
    EmptyDestination {
        /// Position of the offending target in the configured list.
        index: usize,
    },

    /// No metadata path was given and none could be derived from the
    /// environment (no resolvable home directory).
    #[error("could not resolve a default metadata path; set one explicitly")]
    NoMetadataPath,
}

/// Failures talking to the remote release host.
///
/// Produced by [`ReleaseProvider`](crate::github::ReleaseProvider)
/// implementations and by the engine's own timeout bounds, then wrapped into
/// [`SyncError`] with the stage that observed them.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The HTTP request itself failed (connection, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code of the response.
        status: reqwest::StatusCode,
        /// URL that produced the response.
        url: String,
    },

    /// The release payload carried no usable tag name.
    #[error("release has no tag name")]
    MissingIdentifier,

    /// The release payload carried no downloadable archive URL.
    #[error("release has no zipball URL")]
    MissingDownloadUrl,

    /// The operation exceeded its configured bound and was cancelled.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Extraction-time failures.
///
/// Extraction aborts on the first failure and leaves any files written so far
/// in place; a retried synchronization simply overwrites them.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The byte stream is not a valid zip archive.
    #[error("malformed zip archive")]
    Malformed(#[source] zip::result::ZipError),

    /// A filesystem operation failed while writing an entry.
    #[error("filesystem operation failed at {path}")]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A computed destination path was not absolute. This guards against
    /// misconfigured destination roots, not against archive content.
    #[error("destination path must be absolute: {path}")]
    InvalidPath {
        /// The rejected destination path.
        path: PathBuf,
    },
}

/// Failures of a single `synchronize` call, tagged with the failing stage.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The latest-release query failed, timed out, or returned a release
    /// without a usable identifier.
    #[error("failed to query latest release")]
    RemoteUnavailable(#[source] RemoteError),

    /// The archive fetch failed, timed out, returned a non-success status,
    /// or the release had no download URL.
    #[error("failed to download release archive")]
    DownloadFailed(#[source] RemoteError),

    /// Extraction failed; the metadata record was not updated, so the next
    /// call retries the same version.
    #[error("failed to extract release archive")]
    ExtractFailed(#[from] ArchiveError),
}
