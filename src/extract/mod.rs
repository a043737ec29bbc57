//! Selective zip extraction with per-target routing.
//!
//! Release zipballs wrap every entry in a single synthetic top-level
//! directory (`reponame-tag/...`). Extraction strips that segment, runs each
//! remaining name through a coarse [`ExtractFilter`] and then through every
//! configured target's [`PathRouter`], and writes accepted entries under the
//! target's destination root, creating parent directories as needed.
//!
//! One entry accepted by several targets is written once per accepting
//! target (fan-out). When an archive contains duplicate names under the same
//! target, the last entry in archive order wins. Extraction aborts on the
//! first filesystem failure and performs no rollback: a retried
//! synchronization overwrites whatever was left behind.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zip::ZipArchive;

use crate::core::error::ArchiveError;
use crate::router::{ExtractFilter, PathRouter};

/// One place extracted entries may land: a routing policy plus the
/// destination root it writes under.
#[derive(Debug, Clone)]
pub struct ExtractTarget {
    /// Policy deciding which entries this target takes and under what
    /// relative path.
    pub router: PathRouter,
    /// Directory the routed paths are joined onto. Must resolve to an
    /// absolute path by extraction time.
    pub dest_dir: PathBuf,
}

impl ExtractTarget {
    /// Create a target from a router and destination root.
    pub fn new(router: PathRouter, dest_dir: impl Into<PathBuf>) -> Self {
        Self { router, dest_dir: dest_dir.into() }
    }
}

/// Extract `bytes` as a zip archive into every accepting target.
///
/// Directory entries and entries at the synthetic root (no `/` in the name)
/// are skipped. Fails with [`ArchiveError::Malformed`] when the bytes are
/// not a valid archive, [`ArchiveError::InvalidPath`] when a computed
/// destination is not absolute, and [`ArchiveError::Io`] on the first
/// filesystem failure.
pub fn extract_archive(
    bytes: &[u8],
    targets: &[ExtractTarget],
    filter: &ExtractFilter,
) -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(ArchiveError::Malformed)?;
    debug!(entries = archive.len(), targets = targets.len(), "extracting release archive");

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(ArchiveError::Malformed)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let Some(stripped) = strip_root_dir(&name) else {
            trace!(%name, "entry at synthetic root, skipping");
            continue;
        };
        if !filter.should_extract(stripped) {
            continue;
        }

        let destinations: Vec<PathBuf> = targets
            .iter()
            .filter_map(|target| {
                target.router.route(stripped).map(|routed| target.dest_dir.join(routed))
            })
            .collect();
        if destinations.is_empty() {
            continue;
        }

        let mut content = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut content)
            .map_err(|source| ArchiveError::Io { path: PathBuf::from(stripped), source })?;

        for destination in destinations {
            write_entry(&content, &destination)?;
        }
    }

    Ok(())
}

/// Strip the synthetic top-level directory segment from an entry name.
///
/// A name with no separator sits at the synthetic root and carries no real
/// content; `None` tells the caller to skip it.
fn strip_root_dir(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once('/')?;
    (!rest.is_empty()).then_some(rest)
}

fn write_entry(content: &[u8], destination: &Path) -> Result<(), ArchiveError> {
    if !destination.is_absolute() {
        return Err(ArchiveError::InvalidPath { path: destination.to_path_buf() });
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| ArchiveError::Io { path: parent.to_path_buf(), source })?;
    }
    fs::write(destination, content)
        .map_err(|source| ArchiveError::Io { path: destination.to_path_buf(), source })?;

    trace!(path = %destination.display(), bytes = content.len(), "wrote entry");
    Ok(())
}
