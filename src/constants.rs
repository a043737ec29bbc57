//! Global constants used throughout relsync.
//!
//! Timeout defaults and fixed endpoints live here so the values stay
//! discoverable instead of being scattered as magic numbers.

use std::time::Duration;

/// Default bound for the latest-release metadata query (3 seconds).
///
/// The query is a single small JSON request; anything slower than this is
/// treated as the remote being unavailable.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Default bound for the release archive download (30 seconds).
///
/// Covers both the tag lookup and the full zipball fetch, which may be
/// several megabytes on a slow link.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Directory under the user's home where version records are kept when no
/// explicit metadata path is configured.
pub const METADATA_DIR_NAME: &str = ".relsync";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";
