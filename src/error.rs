//! Error types for scoring and extraction.

use thiserror::Error;

/// Errors raised by the scoring API.
///
/// Degenerate inputs (empty strings, empty choice collections) are never
/// errors; they score 0 or produce an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuzzError {
    /// A required text argument was absent
    #[error("{argument} is None")]
    MissingInput { argument: &'static str },

    /// A scorer name did not match any built-in algorithm
    #[error(
        "Unknown algorithm: '{0}'. Valid: ratio, partial_ratio, token_sort_ratio, \
         partial_token_sort_ratio, token_set_ratio, partial_token_set_ratio, qratio, uqratio, \
         wratio, uwratio"
    )]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, FuzzError>;
