//! FuzzyWuzzy-style scorers built on longest-matching-block alignment.
//!
//! All scores are integers in `0..=100`:
//! - `ratio`: direct alignment ratio of the raw strings
//! - `partial_ratio`: best alignment of the shorter string against a
//!   window of the longer one
//! - `token_sort_ratio` / `partial_token_sort_ratio`: order-insensitive
//! - `token_set_ratio` / `partial_token_set_ratio`: order- and
//!   duplicate-insensitive
//! - `quick_ratio`: `ratio` of the normalized strings
//! - `wratio`: weighted maximum of the above, gated by relative length
//!
//! `ratio` and `partial_ratio` compare their inputs as given. Every other
//! scorer normalizes with [`full_process`] first; the `force_ascii` flag
//! selects whether non-ASCII characters are stripped during normalization.

use super::matcher::{scale_ratio, SequenceMatcher};
use super::normalize::full_process;
use crate::error::{FuzzError, Result};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Window ratio above which `partial_ratio` reports a perfect match.
const NEAR_EXACT_RATIO: f64 = 0.995;

// =============================================================================
// Basic scorers
// =============================================================================

/// Alignment ratio of two strings, scaled to `0..=100`.
///
/// Empty input on either side scores 0.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::fuzz::ratio;
/// assert_eq!(ratio("this is a test", "this is a test!"), 97);
/// assert_eq!(ratio("", "abc"), 0);
/// ```
#[must_use]
pub fn ratio(s1: &str, s2: &str) -> u8 {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    scale_ratio(SequenceMatcher::new(&a, &b).ratio())
}

/// [`ratio`] for inputs that may be absent.
///
/// # Errors
/// Returns [`FuzzError::MissingInput`] if either argument is `None`.
pub fn checked_ratio(s1: Option<&str>, s2: Option<&str>) -> Result<u8> {
    let (s1, s2) = require_both(s1, s2)?;
    Ok(ratio(s1, s2))
}

/// Ratio of the best-matching window of the longer string.
///
/// The shorter string is aligned against the longer one; each matching
/// block suggests a window of the longer string, of the shorter string's
/// length, that lines the block up. The best window ratio wins. When the
/// lengths are equal, the first argument is treated as the shorter one.
///
/// Windows are compared as char slices of the longer string, without
/// allocating a new string per window.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::fuzz::partial_ratio;
/// assert_eq!(partial_ratio("test", "this is a test"), 100);
/// ```
#[must_use]
pub fn partial_ratio(s1: &str, s2: &str) -> u8 {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let c1: Vec<char> = s1.chars().collect();
    let c2: Vec<char> = s2.chars().collect();
    let (shorter, longer) = if c1.len() <= c2.len() {
        (&c1[..], &c2[..])
    } else {
        (&c2[..], &c1[..])
    };

    let blocks = SequenceMatcher::new(shorter, longer).matching_blocks();

    // e.g. shorter = "abcd", longer = "XXXbcdeEEE", block = (1, 3, 3):
    // the window starting at 3 - 1 = 2 lines "bcd" up, giving ratio("abcd", "Xbcd")
    let mut best = 0.0f64;
    for block in &blocks {
        let long_start = block.b.saturating_sub(block.a);
        let long_end = (long_start + shorter.len()).min(longer.len());
        let window = &longer[long_start..long_end];

        let r = SequenceMatcher::new(shorter, window).ratio();
        if r > NEAR_EXACT_RATIO {
            return 100;
        }
        best = best.max(r);
    }

    (100.0 * best) as u8
}

/// [`partial_ratio`] for inputs that may be absent.
///
/// # Errors
/// Returns [`FuzzError::MissingInput`] if either argument is `None`.
pub fn checked_partial_ratio(s1: Option<&str>, s2: Option<&str>) -> Result<u8> {
    let (s1, s2) = require_both(s1, s2)?;
    Ok(partial_ratio(s1, s2))
}

fn require_both<'a>(s1: Option<&'a str>, s2: Option<&'a str>) -> Result<(&'a str, &'a str)> {
    let s1 = s1.ok_or(FuzzError::MissingInput { argument: "s1" })?;
    let s2 = s2.ok_or(FuzzError::MissingInput { argument: "s2" })?;
    Ok((s1, s2))
}

/// Pick the base scorer used by the token variants.
fn base_scorer(partial: bool) -> fn(&str, &str) -> u8 {
    if partial {
        partial_ratio
    } else {
        ratio
    }
}

// =============================================================================
// Token scorers
// =============================================================================

/// Normalize, split on whitespace, sort the tokens, and rejoin.
fn process_and_sort(s: &str, force_ascii: bool) -> String {
    let processed = full_process(s, force_ascii);
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort(s1: &str, s2: &str, partial: bool, force_ascii: bool) -> u8 {
    let sorted1 = process_and_sort(s1, force_ascii);
    let sorted2 = process_and_sort(s2, force_ascii);
    base_scorer(partial)(&sorted1, &sorted2)
}

/// Compare after sorting the tokens of both strings.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::fuzz::token_sort_ratio;
/// assert_eq!(token_sort_ratio("new york mets", "mets new york", true), 100);
/// ```
#[must_use]
pub fn token_sort_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    token_sort(s1, s2, false, force_ascii)
}

/// [`partial_ratio`] of the token-sorted strings.
#[must_use]
pub fn partial_token_sort_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    token_sort(s1, s2, true, force_ascii)
}

fn sorted_join(mut tokens: Vec<&str>) -> String {
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Token-set comparison.
///
/// With `I` the sorted intersection of the two token sets and `D1`, `D2`
/// each side's sorted remainder, compares `I` against `I + D1`, `I`
/// against `I + D2`, and `I + D1` against `I + D2`, keeping the best.
fn token_set(s1: &str, s2: &str, partial: bool, force_ascii: bool) -> u8 {
    let p1 = full_process(s1, force_ascii);
    let p2 = full_process(s2, force_ascii);

    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let tokens1: AHashSet<&str> = p1.split_whitespace().collect();
    let tokens2: AHashSet<&str> = p2.split_whitespace().collect();

    let sorted_sect = sorted_join(tokens1.intersection(&tokens2).copied().collect());
    let sorted_1to2 = sorted_join(tokens1.difference(&tokens2).copied().collect());
    let sorted_2to1 = sorted_join(tokens2.difference(&tokens1).copied().collect());

    let combined_1to2 = format!("{} {}", sorted_sect, sorted_1to2);
    let combined_2to1 = format!("{} {}", sorted_sect, sorted_2to1);
    let combined_1to2 = combined_1to2.trim();
    let combined_2to1 = combined_2to1.trim();

    let score = base_scorer(partial);
    [
        score(&sorted_sect, combined_1to2),
        score(&sorted_sect, combined_2to1),
        score(combined_1to2, combined_2to1),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Compare token sets, tolerating reordering and extra or repeated tokens.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::fuzz::token_set_ratio;
/// assert_eq!(token_set_ratio("mariners vs angels", "angels vs mariners", true), 100);
/// assert_eq!(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear", true), 100);
/// ```
#[must_use]
pub fn token_set_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    token_set(s1, s2, false, force_ascii)
}

/// [`token_set_ratio`] using [`partial_ratio`] for the pairwise comparisons.
#[must_use]
pub fn partial_token_set_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    token_set(s1, s2, true, force_ascii)
}

// =============================================================================
// Combination scorers
// =============================================================================

/// [`ratio`] of the normalized strings; 0 if either normalizes to empty.
#[must_use]
pub fn quick_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    let p1 = full_process(s1, force_ascii);
    let p2 = full_process(s2, force_ascii);

    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    ratio(&p1, &p2)
}

/// Quick ratio with ASCII coercion.
#[must_use]
pub fn qratio(s1: &str, s2: &str) -> u8 {
    quick_ratio(s1, s2, true)
}

/// Quick ratio preserving Unicode.
#[must_use]
pub fn uqratio(s1: &str, s2: &str) -> u8 {
    quick_ratio(s1, s2, false)
}

// =============================================================================
// WRatio Weight Constants
// =============================================================================
//
// Token-based and partial scores are weaker evidence than a direct
// alignment, so they are discounted before taking the maximum.

/// Discount applied to token-based scores.
pub const DEFAULT_UNBASE_SCALE: f64 = 0.95;

/// Discount applied to partial scores.
pub const DEFAULT_PARTIAL_SCALE: f64 = 0.90;

/// Discount applied to partial scores when one string is much shorter.
pub const DEFAULT_LONG_PARTIAL_SCALE: f64 = 0.60;

/// Length ratio from which partial scorers are considered.
pub const DEFAULT_PARTIAL_THRESHOLD: f64 = 1.5;

/// Length ratio above which [`DEFAULT_LONG_PARTIAL_SCALE`] applies.
pub const DEFAULT_LONG_THRESHOLD: f64 = 8.0;

/// Weights and length gates for [`wratio_with_weights`].
///
/// Deserializes with missing fields filled from the defaults, so a config
/// file only needs to name the values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WRatioWeights {
    /// Multiplier for token-sort and token-set scores
    pub unbase_scale: f64,
    /// Multiplier for partial scores
    pub partial_scale: f64,
    /// Multiplier for partial scores past `long_threshold`
    pub long_partial_scale: f64,
    /// Partial scorers are skipped below this length ratio
    pub partial_threshold: f64,
    /// Length ratio above which `long_partial_scale` replaces `partial_scale`
    pub long_threshold: f64,
}

impl Default for WRatioWeights {
    fn default() -> Self {
        Self {
            unbase_scale: DEFAULT_UNBASE_SCALE,
            partial_scale: DEFAULT_PARTIAL_SCALE,
            long_partial_scale: DEFAULT_LONG_PARTIAL_SCALE,
            partial_threshold: DEFAULT_PARTIAL_THRESHOLD,
            long_threshold: DEFAULT_LONG_THRESHOLD,
        }
    }
}

/// Weighted ratio with ASCII coercion.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::fuzz::wratio;
/// assert_eq!(wratio("Atlanta Falcons", "Falcons"), 90);
/// ```
#[must_use]
pub fn wratio(s1: &str, s2: &str) -> u8 {
    wratio_with_weights(s1, s2, true, &WRatioWeights::default())
}

/// Weighted ratio preserving Unicode.
#[must_use]
pub fn uwratio(s1: &str, s2: &str) -> u8 {
    wratio_with_weights(s1, s2, false, &WRatioWeights::default())
}

/// Weighted ratio: the best of several scorers, chosen by relative length.
///
/// - Strings of comparable length (ratio below `partial_threshold`): best of
///   `ratio`, `token_sort_ratio * unbase` and `token_set_ratio * unbase`.
/// - Otherwise: best of `ratio`, `partial_ratio * partial` and the partial
///   token scores `* unbase * partial`, where `partial` drops to
///   `long_partial_scale` once the length ratio exceeds `long_threshold`.
///
/// The result is truncated to an integer.
#[must_use]
pub fn wratio_with_weights(s1: &str, s2: &str, force_ascii: bool, weights: &WRatioWeights) -> u8 {
    let p1 = full_process(s1, force_ascii);
    let p2 = full_process(s2, force_ascii);

    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = f64::from(ratio(&p1, &p2));

    let len1 = p1.chars().count();
    let len2 = p2.chars().count();
    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;

    let try_partial = len_ratio >= weights.partial_threshold;
    let partial_scale = if len_ratio > weights.long_threshold {
        weights.long_partial_scale
    } else {
        weights.partial_scale
    };
    let unbase_scale = weights.unbase_scale;

    tracing::trace!(len_ratio, try_partial, partial_scale, "wratio path");

    let best = if try_partial {
        let token_partial = |score: u8| f64::from(score) * unbase_scale * partial_scale;
        let partial = f64::from(partial_ratio(&p1, &p2)) * partial_scale;
        let ptsor = token_partial(partial_token_sort_ratio(&p1, &p2, force_ascii));
        let ptser = token_partial(partial_token_set_ratio(&p1, &p2, force_ascii));
        base.max(partial).max(ptsor).max(ptser)
    } else {
        let tsor = f64::from(token_sort_ratio(&p1, &p2, force_ascii)) * unbase_scale;
        let tser = f64::from(token_set_ratio(&p1, &p2, force_ascii)) * unbase_scale;
        base.max(tsor).max(tser)
    };

    best.clamp(0.0, 100.0) as u8
}
