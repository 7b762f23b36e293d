//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they pass registry lookups through.

use thiserror::Error;

/// Errors raised by the foundational types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A tag name is not present in the registry.  This is a
    /// configuration/data mismatch and must be fixed upstream.
    #[error("unknown tag {0:?}")]
    UnknownTag(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `trail-core`.
pub type CoreResult<T> = Result<T, CoreError>;
