//! Core string similarity algorithms
//!
//! Each scorer is a standalone function for composability, plus a
//! trait-based interface so the extractor can take any scorer as a
//! strategy.

pub mod fuzz;
pub mod matcher;
pub mod normalize;

pub use fuzz::*;
pub use matcher::{align, Alignment, MatchingBlock, SequenceMatcher};
pub use normalize::{full_process, FullProcess};

use crate::error::FuzzError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait for all scorers.
/// Returns an integer score between 0 (completely different) and 100 (identical).
///
/// Any `Fn(&str, &str) -> u8` closure or function is a scorer, so custom
/// scoring logic can be passed wherever a built-in [`Algorithm`] is accepted.
pub trait Scorer: Send + Sync {
    fn score(&self, s1: &str, s2: &str) -> u8;

    /// Name of the scorer for debugging/logging
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Scorer for F
where
    F: Fn(&str, &str) -> u8 + Send + Sync,
{
    fn score(&self, s1: &str, s2: &str) -> u8 {
        self(s1, s2)
    }
}

/// The built-in scorers, selectable by name.
///
/// Variants carrying `force_ascii` normalize their input; `Ratio` and
/// `PartialRatio` compare strings as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum Algorithm {
    Ratio,
    PartialRatio,
    TokenSortRatio { force_ascii: bool },
    PartialTokenSortRatio { force_ascii: bool },
    TokenSetRatio { force_ascii: bool },
    PartialTokenSetRatio { force_ascii: bool },
    #[serde(rename = "qratio")]
    QRatio { force_ascii: bool },
    #[serde(rename = "wratio")]
    WRatio { force_ascii: bool },
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::WRatio { force_ascii: true }
    }
}

impl Scorer for Algorithm {
    fn score(&self, s1: &str, s2: &str) -> u8 {
        match *self {
            Algorithm::Ratio => fuzz::ratio(s1, s2),
            Algorithm::PartialRatio => fuzz::partial_ratio(s1, s2),
            Algorithm::TokenSortRatio { force_ascii } => {
                fuzz::token_sort_ratio(s1, s2, force_ascii)
            }
            Algorithm::PartialTokenSortRatio { force_ascii } => {
                fuzz::partial_token_sort_ratio(s1, s2, force_ascii)
            }
            Algorithm::TokenSetRatio { force_ascii } => fuzz::token_set_ratio(s1, s2, force_ascii),
            Algorithm::PartialTokenSetRatio { force_ascii } => {
                fuzz::partial_token_set_ratio(s1, s2, force_ascii)
            }
            Algorithm::QRatio { force_ascii } => fuzz::quick_ratio(s1, s2, force_ascii),
            Algorithm::WRatio { force_ascii } => {
                fuzz::wratio_with_weights(s1, s2, force_ascii, &fuzz::WRatioWeights::default())
            }
        }
    }

    fn name(&self) -> &'static str {
        match *self {
            Algorithm::Ratio => "ratio",
            Algorithm::PartialRatio => "partial_ratio",
            Algorithm::TokenSortRatio { .. } => "token_sort_ratio",
            Algorithm::PartialTokenSortRatio { .. } => "partial_token_sort_ratio",
            Algorithm::TokenSetRatio { .. } => "token_set_ratio",
            Algorithm::PartialTokenSetRatio { .. } => "partial_token_set_ratio",
            Algorithm::QRatio { force_ascii: true } => "qratio",
            Algorithm::QRatio { force_ascii: false } => "uqratio",
            Algorithm::WRatio { force_ascii: true } => "wratio",
            Algorithm::WRatio { force_ascii: false } => "uwratio",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FuzzError;

    /// Parse a scorer name. Token scorers parse with ASCII coercion on,
    /// matching their defaults; `uqratio` and `uwratio` select the
    /// Unicode-preserving combination scorers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ratio" => Ok(Algorithm::Ratio),
            "partial_ratio" => Ok(Algorithm::PartialRatio),
            "token_sort_ratio" => Ok(Algorithm::TokenSortRatio { force_ascii: true }),
            "partial_token_sort_ratio" => {
                Ok(Algorithm::PartialTokenSortRatio { force_ascii: true })
            }
            "token_set_ratio" => Ok(Algorithm::TokenSetRatio { force_ascii: true }),
            "partial_token_set_ratio" => Ok(Algorithm::PartialTokenSetRatio { force_ascii: true }),
            "qratio" | "quick_ratio" => Ok(Algorithm::QRatio { force_ascii: true }),
            "uqratio" => Ok(Algorithm::QRatio { force_ascii: false }),
            "wratio" | "weighted_ratio" => Ok(Algorithm::WRatio { force_ascii: true }),
            "uwratio" => Ok(Algorithm::WRatio { force_ascii: false }),
            _ => Err(FuzzError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// [`fuzz::wratio_with_weights`] with fixed weights, usable as a [`Scorer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedRatio {
    pub force_ascii: bool,
    pub weights: fuzz::WRatioWeights,
}

impl WeightedRatio {
    #[must_use]
    pub fn new(force_ascii: bool, weights: fuzz::WRatioWeights) -> Self {
        Self { force_ascii, weights }
    }
}

impl Scorer for WeightedRatio {
    fn score(&self, s1: &str, s2: &str) -> u8 {
        fuzz::wratio_with_weights(s1, s2, self.force_ascii, &self.weights)
    }

    fn name(&self) -> &'static str {
        "weighted_ratio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("wratio".parse::<Algorithm>().unwrap(), Algorithm::default());
        assert_eq!(
            "UWRatio".parse::<Algorithm>().unwrap(),
            Algorithm::WRatio { force_ascii: false }
        );
        assert_eq!(
            "token_set_ratio".parse::<Algorithm>().unwrap(),
            Algorithm::TokenSetRatio { force_ascii: true }
        );
        assert!(matches!(
            "levenshtein".parse::<Algorithm>(),
            Err(FuzzError::UnknownAlgorithm(name)) if name == "levenshtein"
        ));
    }

    #[test]
    fn test_algorithm_name_round_trips_through_parse() {
        let all = [
            Algorithm::Ratio,
            Algorithm::PartialRatio,
            Algorithm::TokenSortRatio { force_ascii: true },
            Algorithm::PartialTokenSortRatio { force_ascii: true },
            Algorithm::TokenSetRatio { force_ascii: true },
            Algorithm::PartialTokenSetRatio { force_ascii: true },
            Algorithm::QRatio { force_ascii: true },
            Algorithm::QRatio { force_ascii: false },
            Algorithm::WRatio { force_ascii: true },
            Algorithm::WRatio { force_ascii: false },
        ];
        for algorithm in all {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_algorithm_scores_match_functions() {
        let (a, b) = ("New York Mets", "new york mets vs atlanta braves");
        assert_eq!(Algorithm::Ratio.score(a, b), fuzz::ratio(a, b));
        assert_eq!(Algorithm::PartialRatio.score(a, b), fuzz::partial_ratio(a, b));
        assert_eq!(
            Algorithm::TokenSetRatio { force_ascii: true }.score(a, b),
            fuzz::token_set_ratio(a, b, true)
        );
        assert_eq!(Algorithm::default().score(a, b), fuzz::wratio(a, b));
        assert_eq!(Algorithm::QRatio { force_ascii: false }.score(a, b), fuzz::uqratio(a, b));
    }

    #[test]
    fn test_closure_is_scorer() {
        let exact = |a: &str, b: &str| -> u8 { if a == b { 100 } else { 0 } };
        assert_eq!(exact.score("x", "x"), 100);
        assert_eq!(exact.name(), "custom");
        let func: fn(&str, &str) -> u8 = fuzz::ratio;
        assert_eq!(func.score("abc", "abc"), 100);
    }

    #[test]
    fn test_weighted_ratio_scorer() {
        let scorer = WeightedRatio::new(true, fuzz::WRatioWeights::default());
        assert_eq!(
            scorer.score("Atlanta Falcons", "Falcons"),
            fuzz::wratio("Atlanta Falcons", "Falcons")
        );
    }

    #[test]
    fn test_algorithm_serde_tagged() {
        let json = serde_json::to_string(&Algorithm::WRatio { force_ascii: false }).unwrap();
        assert_eq!(json, r#"{"algorithm":"wratio","force_ascii":false}"#);
        let parsed: Algorithm = serde_json::from_str(r#"{"algorithm":"ratio"}"#).unwrap();
        assert_eq!(parsed, Algorithm::Ratio);
    }
}
