//! Engine decision-policy tests: idempotence, repair, and failure paths.

use std::time::Duration;

use relsync::core::error::{RemoteError, SyncError};
use relsync::github::{Release, ReleaseProvider};
use relsync::metadata::MetadataStore;
use relsync::router::PathRouter;
use relsync::sync::{SyncConfig, SyncStatus, Synchronizer};
use tempfile::TempDir;

use crate::common::{FakeProvider, build_zip};

fn simple_zip() -> Vec<u8> {
    build_zip(&[("repo-v1.0.0/agents/foo.md", "A"), ("repo-v1.0.0/README.md", "C")])
}

fn engine(temp: &TempDir, provider: FakeProvider) -> Synchronizer<FakeProvider> {
    let config = SyncConfig::builder("owner", "repo")
        .target(PathRouter::KeepAll, temp.path().join("dest"))
        .metadata_path(temp.path().join("metadata.json"))
        .build()
        .unwrap();
    Synchronizer::new(config, provider)
}

#[tokio::test]
async fn first_call_downloads_extracts_and_records() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()));

    let status = sync.synchronize().await.unwrap();

    assert_eq!(status, SyncStatus::Refreshed { version: "v1.0.0".into() });
    let foo = std::fs::read_to_string(temp.path().join("dest/agents/foo.md")).unwrap();
    assert_eq!(foo, "A");

    let store = MetadataStore::new(temp.path().join("metadata.json"));
    assert_eq!(store.load_version().await, "v1.0.0");
}

#[tokio::test]
async fn unchanged_version_skips_the_download_but_advances_the_timestamp() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()));
    let store = MetadataStore::new(temp.path().join("metadata.json"));

    sync.synchronize().await.unwrap();
    let first = store.load().await.unwrap();

    let status = sync.synchronize().await.unwrap();
    let second = store.load().await.unwrap();

    assert_eq!(status, SyncStatus::Current { version: "v1.0.0".into() });
    assert_eq!(sync_downloads(&sync), 1);
    assert_eq!(second.version, first.version);
    assert!(second.last_check_at >= first.last_check_at);
}

#[tokio::test]
async fn changed_remote_version_triggers_a_fresh_download() {
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("metadata.json");

    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()));
    sync.synchronize().await.unwrap();

    let newer = build_zip(&[("repo-v2.0.0/agents/foo.md", "A2")]);
    let sync = engine(&temp, FakeProvider::new("v2.0.0", newer));
    let status = sync.synchronize().await.unwrap();

    assert_eq!(status, SyncStatus::Refreshed { version: "v2.0.0".into() });
    let foo = std::fs::read_to_string(temp.path().join("dest/agents/foo.md")).unwrap();
    assert_eq!(foo, "A2");
    assert_eq!(MetadataStore::new(store_path).load_version().await, "v2.0.0");
}

#[tokio::test]
async fn deleted_destination_is_repaired_on_an_unchanged_version() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()));

    sync.synchronize().await.unwrap();
    std::fs::remove_dir_all(temp.path().join("dest")).unwrap();

    let status = sync.synchronize().await.unwrap();

    assert_eq!(status, SyncStatus::Refreshed { version: "v1.0.0".into() });
    assert_eq!(sync_downloads(&sync), 2);
    assert!(temp.path().join("dest/agents/foo.md").exists());
}

#[tokio::test]
async fn emptied_destination_is_repaired_on_an_unchanged_version() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()));

    sync.synchronize().await.unwrap();
    let dest = temp.path().join("dest");
    std::fs::remove_dir_all(&dest).unwrap();
    std::fs::create_dir_all(&dest).unwrap();

    let status = sync.synchronize().await.unwrap();

    assert_eq!(status, SyncStatus::Refreshed { version: "v1.0.0".into() });
    assert_eq!(sync_downloads(&sync), 2);
}

#[tokio::test]
async fn release_without_a_tag_is_remote_unavailable() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::untagged());

    let error = sync.synchronize().await.unwrap_err();

    assert!(matches!(error, SyncError::RemoteUnavailable(RemoteError::MissingIdentifier)));
    let store = MetadataStore::new(temp.path().join("metadata.json"));
    assert_eq!(store.load_version().await, "");
}

#[tokio::test]
async fn failed_archive_fetch_leaves_metadata_untouched() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()).failing_fetch());

    let error = sync.synchronize().await.unwrap_err();

    assert!(matches!(error, SyncError::DownloadFailed(RemoteError::Status { .. })));
    let store = MetadataStore::new(temp.path().join("metadata.json"));
    assert_eq!(store.load_version().await, "");
}

#[tokio::test]
async fn malformed_archive_fails_extraction_and_is_retried_next_call() {
    let temp = TempDir::new().unwrap();
    let sync = engine(&temp, FakeProvider::new("v1.0.0", b"not a zipball".to_vec()));

    let error = sync.synchronize().await.unwrap_err();
    assert!(matches!(error, SyncError::ExtractFailed(_)));

    // The version was never recorded, so a later call starts over.
    let store = MetadataStore::new(temp.path().join("metadata.json"));
    assert_eq!(store.load_version().await, "");

    let sync = engine(&temp, FakeProvider::new("v1.0.0", simple_zip()));
    let status = sync.synchronize().await.unwrap();
    assert_eq!(status, SyncStatus::Refreshed { version: "v1.0.0".into() });
}

#[tokio::test]
async fn slow_metadata_query_times_out_as_remote_unavailable() {
    struct StalledProvider;

    impl ReleaseProvider for StalledProvider {
        async fn latest_release(&self, _: &str, _: &str) -> Result<Release, RemoteError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("the engine cancels this future first");
        }

        async fn release_by_tag(&self, _: &str, _: &str, _: &str) -> Result<Release, RemoteError> {
            unreachable!("never reached in this test");
        }

        async fn fetch_archive(&self, _: &str) -> Result<Vec<u8>, RemoteError> {
            unreachable!("never reached in this test");
        }
    }

    let temp = TempDir::new().unwrap();
    let config = SyncConfig::builder("owner", "repo")
        .target(PathRouter::KeepAll, temp.path().join("dest"))
        .metadata_path(temp.path().join("metadata.json"))
        .request_timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let error = Synchronizer::new(config, StalledProvider).synchronize().await.unwrap_err();
    assert!(matches!(error, SyncError::RemoteUnavailable(RemoteError::Timeout(_))));
}

fn sync_downloads(sync: &Synchronizer<FakeProvider>) -> usize {
    sync.provider().download_count()
}
