//! Shared fixtures for the integration suite.

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use relsync::core::error::RemoteError;
use relsync::github::{Release, ReleaseProvider};
use zip::write::SimpleFileOptions;

/// Build an in-memory zip from `(name, content)` pairs. Names ending in
/// `/` become directory entries.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.to_string(), SimpleFileOptions::default()).unwrap();
        } else {
            writer.start_file(name.to_string(), SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// An in-memory release host serving a single release.
pub struct FakeProvider {
    tag: Option<String>,
    zipball: Vec<u8>,
    fail_fetch: bool,
    downloads: AtomicUsize,
}

impl FakeProvider {
    pub fn new(tag: &str, zipball: Vec<u8>) -> Self {
        Self { tag: Some(tag.to_string()), zipball, fail_fetch: false, downloads: AtomicUsize::new(0) }
    }

    /// A provider whose latest release carries no tag.
    pub fn untagged() -> Self {
        Self { tag: None, zipball: Vec::new(), fail_fetch: false, downloads: AtomicUsize::new(0) }
    }

    /// Make every archive fetch answer 404.
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// How many archive fetches the engine performed.
    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    fn release(&self) -> Release {
        Release {
            tag_name: self.tag.clone(),
            zipball_url: Some("https://releases.example.test/zipball".to_string()),
        }
    }
}

impl ReleaseProvider for FakeProvider {
    async fn latest_release(&self, _owner: &str, _repo: &str) -> Result<Release, RemoteError> {
        Ok(self.release())
    }

    async fn release_by_tag(
        &self,
        _owner: &str,
        _repo: &str,
        _tag: &str,
    ) -> Result<Release, RemoteError> {
        Ok(self.release())
    }

    async fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        if self.fail_fetch {
            return Err(RemoteError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            });
        }
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.zipball.clone())
    }
}
