//! fuzzylogic - fuzzy string scoring and ranking
//!
//! Scores how similar two strings are and ranks a collection of choices
//! against a query. Everything is built on one alignment primitive: find
//! the longest common contiguous block, recurse on both sides, and score
//! `2M / T` where `M` is the number of matched characters and `T` the
//! combined length.
//!
//! # Features
//! - `ratio` / `partial_ratio`: direct and best-window alignment scores
//! - Token sort and token set scorers that ignore word order and repeats
//! - `wratio`: weighted blend of all of the above, gated by relative length
//! - `process::Extractor`: top-k extraction over lists or keyed maps
//! - Optional Python bindings (`python` feature)
//!
//! # Example
//! ```
//! use fuzzylogic::{extract_one, partial_ratio, token_sort_ratio, wratio, Choices};
//!
//! assert_eq!(partial_ratio("test", "this is a test"), 100);
//! assert_eq!(token_sort_ratio("new york mets", "mets new york", true), 100);
//! assert!(wratio("Atlanta Falcons", "Falcons") > 80);
//!
//! let teams = ["Atlanta Falcons", "New York Jets", "Dallas Cowboys"];
//! let best = extract_one("cowboys", Choices::list(&teams), 0).unwrap();
//! assert_eq!(*best.choice, "Dallas Cowboys");
//! ```

pub mod algorithms;
pub mod error;
pub mod process;

#[cfg(feature = "python")]
mod python;

pub use algorithms::fuzz::{
    checked_partial_ratio, checked_ratio, partial_ratio, partial_token_set_ratio,
    partial_token_sort_ratio, qratio, quick_ratio, ratio, token_set_ratio, token_sort_ratio,
    uqratio, uwratio, wratio, wratio_with_weights, WRatioWeights,
};
pub use algorithms::matcher::{align, Alignment, MatchingBlock};
pub use algorithms::normalize::{full_process, FullProcess};
pub use algorithms::{Algorithm, Scorer, WeightedRatio};
pub use error::{FuzzError, Result};
pub use process::{
    extract, extract_bests, extract_one, Choices, Extractor, Processor, ScoredChoice,
};
