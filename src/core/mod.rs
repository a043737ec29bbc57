//! Core types shared across relsync.

pub mod error;

pub use error::{ArchiveError, ConfigError, RemoteError, SyncError};
