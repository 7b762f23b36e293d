//! Graph-subsystem error type.

use thiserror::Error;

use trail_core::CoreError;

/// Errors produced by `trail-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Tag(#[from] CoreError),

    /// A routable edge carries a tag without a cost factor — a
    /// trunk-category tag that was not excluded from routing.
    #[error("no cost factor for routable tag {0:?}")]
    MissingCostFactor(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `trail-graph`.
pub type GraphResult<T> = Result<T, GraphError>;
