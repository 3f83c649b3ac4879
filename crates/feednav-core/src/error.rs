//! Error types for page structure validation.

use thiserror::Error;

/// Outcome of a derivation: `Ok(None)` is a silent resolution miss, `Err` a
/// reported structural mismatch. Neither is fatal.
pub type Lookup<T> = std::result::Result<Option<T>, StructuralMismatch>;

/// The host page no longer has the shape the navigation layer expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralMismatch {
    /// Exactly one feed region is expected.
    #[error("expected exactly one feed region, found {found}")]
    FeedCount { found: usize },

    /// The feed region must hold hero banner, dynamic feed and loading state.
    #[error("feed region has {found} children, expected 3")]
    FeedChildCount { found: usize },

    /// The middle child of the feed region is not the dynamic feed.
    #[error("second feed child does not carry the dynamic feed marker")]
    DynamicFeedMissing,

    /// The second readiness stage could not find its anchor.
    #[error("app body region not found")]
    AppBodyMissing,
}
