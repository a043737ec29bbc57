//! relsync - release-driven asset synchronization
//!
//! relsync keeps local directory trees in step with the latest tagged
//! release of a remote GitHub repository: it detects whether a newer
//! release exists, downloads the release zipball, and selectively extracts
//! chosen entries into one or more destination roots while rewriting their
//! paths. It is built to be embedded in larger tools - for example, pulling
//! down agent and prompt definition files bundled in a project's releases -
//! and ships a thin CLI for standalone use.
//!
//! # Architecture Overview
//!
//! A synchronization cycle runs through a short pipeline of fallible
//! stages, and only reaching the final stage commits the durable version
//! record:
//!
//! ```text
//! 1. Check remote     - query the latest release tag (request timeout)
//! 2. Compare          - against the on-disk metadata record, plus a probe
//!                       of every destination root (repairs deleted or
//!                       emptied directories even on an unchanged tag)
//! 3. Download         - tag lookup + full zipball fetch (download timeout)
//! 4. Extract          - strip the synthetic root, route each entry through
//!                       every target, write accepted entries
//! 5. Record           - persist {version, last_check_at}
//! ```
//!
//! An up-to-date local copy short-circuits from step 2 to step 5; the
//! timestamp still advances as a liveness signal.
//!
//! # Core Modules
//!
//! - [`sync`] - the [`Synchronizer`](sync::Synchronizer) engine, its
//!   configuration builder, and the decision policy above
//! - [`router`] - per-entry routing policies ([`PathRouter`](router::PathRouter))
//!   and the coarse pre-routing [`ExtractFilter`](router::ExtractFilter)
//! - [`extract`] - zipball traversal and selective extraction into
//!   [`ExtractTarget`](extract::ExtractTarget)s
//! - [`metadata`] - the tolerant on-disk `{version, last_check_at}` record
//! - [`github`] - the [`ReleaseProvider`](github::ReleaseProvider) boundary
//!   and its GitHub REST implementation
//! - [`core`] - the error taxonomy ([`SyncError`](core::SyncError) and
//!   friends)
//! - [`cli`] - the `relsync sync` command wrapping all of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use relsync::github::GitHubClient;
//! use relsync::router::PathRouter;
//! use relsync::sync::{SyncConfig, Synchronizer};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SyncConfig::builder("acme", "prompt-pack")
//!     .target(
//!         PathRouter::SubdirRebase { subdir: "agents".into(), extension: Some(".md".into()) },
//!         "/home/me/.claude/agents",
//!     )
//!     .target(
//!         PathRouter::SubdirRebase { subdir: "commands".into(), extension: Some(".md".into()) },
//!         "/home/me/.claude/commands",
//!     )
//!     .build()?;
//!
//! let sync = Synchronizer::new(config, GitHubClient::new()?);
//! let status = sync.synchronize().await?;
//! println!("now at {}", status.version());
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Model
//!
//! Construction fails fast with [`ConfigError`](core::ConfigError) before
//! any I/O. A failed cycle returns a [`SyncError`](core::SyncError) naming
//! the stage that broke and leaves the metadata record at its
//! last-known-good value, so the next call retries the same version; files
//! already written by a partial extraction stay in place and are simply
//! overwritten on the next successful pass. There are no built-in retries -
//! each call makes one query attempt and at most one download attempt.

pub mod cli;
pub mod constants;
pub mod core;
pub mod extract;
pub mod github;
pub mod metadata;
pub mod router;
pub mod sync;
