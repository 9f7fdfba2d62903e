//! String normalization applied before scoring.
//!
//! Every scorer that compares "cleaned" text goes through [`full_process`]:
//! - optionally strip characters outside the ASCII range
//! - lowercase
//! - collapse every run of non-letter, non-digit characters into one space
//! - trim leading and trailing whitespace

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Matches runs of characters that are neither Unicode letters nor numbers.
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static pattern is valid"));

/// Strip every character whose code point is above 127.
///
/// Characters are dropped, not transliterated: `"café"` becomes `"caf"`.
#[must_use]
pub fn ascii_only(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

/// Replace each run of non-letter, non-digit characters with a single space.
#[must_use]
pub fn replace_non_alphanumeric(s: &str) -> String {
    NON_ALPHANUMERIC.replace_all(s, " ").into_owned()
}

/// Normalize a string for comparison.
///
/// Absent input (`None`) normalizes to the empty string. The result only
/// contains lowercase letters, digits and single spaces between them, so
/// applying `full_process` twice gives the same string as applying it once.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::normalize::full_process;
///
/// assert_eq!(full_process("  New-York, Mets! ", false), "new york mets");
/// assert_eq!(full_process("Café", true), "caf");
/// assert_eq!(full_process(None, true), "");
/// ```
#[must_use]
pub fn full_process<'a>(s: impl Into<Option<&'a str>>, force_ascii: bool) -> String {
    let Some(s) = s.into() else {
        return String::new();
    };

    let lowered = if force_ascii {
        ascii_only(s).to_lowercase()
    } else {
        s.to_lowercase()
    };

    // Lowercasing first: some mappings (e.g. 'İ') emit combining marks,
    // which must be stripped in this same pass.
    replace_non_alphanumeric(&lowered).trim().to_string()
}

/// Default processor used by the extractor: [`full_process`] on each choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullProcess {
    /// Strip non-ASCII characters before cleaning
    pub force_ascii: bool,
}

impl FullProcess {
    #[must_use]
    pub fn new(force_ascii: bool) -> Self {
        Self { force_ascii }
    }

    #[must_use]
    pub fn process(&self, s: &str) -> String {
        full_process(s, self.force_ascii)
    }
}
