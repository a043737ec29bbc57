//! Entry-name routing policies.
//!
//! A [`PathRouter`] decides, per archive entry name, whether the entry should
//! be extracted and under what destination-relative path. Routers are pure
//! and stateless: the same name always routes the same way, and nothing is
//! shared between invocations.
//!
//! New policies are added as new variants; the extractor only ever calls
//! [`PathRouter::route`] and treats `None` as "do not write this entry for
//! this target".
//!
//! # Examples
//!
//! ```rust
//! use relsync::router::PathRouter;
//!
//! let router = PathRouter::SubdirRebase {
//!     subdir: "agents".into(),
//!     extension: Some(".md".into()),
//! };
//!
//! assert_eq!(router.route("agents/foo.md"), Some("foo.md".into()));
//! assert_eq!(router.route("commands/foo.md"), None);
//! assert_eq!(router.route("agents-new/foo.md"), None);
//! ```

pub mod filter;

pub use filter::ExtractFilter;

/// A routing policy mapping archive entry names to destination-relative
/// paths.
///
/// `None` from [`route`](Self::route) rejects the entry for this target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRouter {
    /// Accept every name unchanged.
    KeepAll,

    /// Accept only names carrying the configured suffix; the match is exact
    /// and case-sensitive (`"file.MD"` does not match `".md"`). Accepted
    /// names pass through unchanged.
    ExtensionFilter {
        /// Required suffix, including the leading dot (e.g. `".md"`).
        extension: String,
    },

    /// Accept only names under `<subdir>/`, stripping that prefix from the
    /// output. The separator is part of the match: `"agents-new/foo.md"`
    /// does not match subdir `"agents"`, and the bare name `"agents"` is
    /// rejected because nothing follows the separator. An optional suffix
    /// filter applies to the remainder.
    SubdirRebase {
        /// Top-level directory the entry must live under, without a
        /// trailing separator.
        subdir: String,
        /// Optional required suffix for the rebased path.
        extension: Option<String>,
    },
}

impl PathRouter {
    /// Route an entry name, returning the destination-relative output path
    /// or `None` when this policy rejects the name.
    pub fn route(&self, name: &str) -> Option<String> {
        match self {
            Self::KeepAll => Some(name.to_string()),
            Self::ExtensionFilter { extension } => {
                name.ends_with(extension.as_str()).then(|| name.to_string())
            }
            Self::SubdirRebase { subdir, extension } => {
                let rest = name.strip_prefix(subdir.as_str())?.strip_prefix('/')?;
                if rest.is_empty() {
                    return None;
                }
                if let Some(extension) = extension {
                    if !rest.ends_with(extension.as_str()) {
                        return None;
                    }
                }
                Some(rest.to_string())
            }
        }
    }
}
