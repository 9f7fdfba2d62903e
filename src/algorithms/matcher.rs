//! Longest-matching-block sequence alignment.
//!
//! Finds the longest contiguous run shared by two sequences, then recurses
//! on the regions to its left and right. The sum of all block lengths `M`
//! gives the similarity ratio `2M / (len(a) + len(b))`.
//!
//! This is not an edit distance: it rewards long shared runs and ignores
//! how the unmatched parts differ.
//!
//! # Complexity
//! - Index build: O(len(b))
//! - Longest-match search: proportional to the number of equal element
//!   pairs in the searched region, O(len(a) * len(b)) in the worst case
//! - Space: O(len(b)) for the position index and the run-length maps

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A run of `size` equal elements starting at `a` in the first sequence and
/// at `b` in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

impl MatchingBlock {
    #[must_use]
    pub const fn new(a: usize, b: usize, size: usize) -> Self {
        Self { a, b, size }
    }
}

/// Aligns two char sequences.
///
/// Borrows both sides so that callers can align against sub-slices of a
/// longer sequence without allocating.
#[derive(Debug, Clone)]
pub struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each element of `b`, ascending
    b2j: AHashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    #[must_use]
    pub fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: AHashMap<char, Vec<usize>> = AHashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block with `alo <= a < ahi` and `blo <= b < bhi`.
    ///
    /// Among blocks of maximal size, returns the one starting earliest in
    /// `a`, and of those the one starting earliest in `b`. Returns a block
    /// of size 0 at `(alo, blo)` when the regions share no element.
    #[must_use]
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let mut best = MatchingBlock::new(alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: AHashMap<usize, usize> = AHashMap::new();
        let mut new_j2len: AHashMap<usize, usize> = AHashMap::new();

        for i in alo..ahi {
            new_j2len.clear();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = match j.checked_sub(1) {
                        Some(pj) => j2len.get(&pj).copied().unwrap_or(0),
                        None => 0,
                    };
                    let k = prev + 1;
                    new_j2len.insert(j, k);
                    // Strict comparison keeps the earliest (i, j) on ties
                    if k > best.size {
                        best = MatchingBlock::new(i + 1 - k, j + 1 - k, k);
                    }
                }
            }
            std::mem::swap(&mut j2len, &mut new_j2len);
        }

        best
    }

    /// All matching blocks, in increasing order, terminated by the
    /// sentinel `(len(a), len(b), 0)`.
    ///
    /// Adjacent blocks are merged so every non-sentinel block is a maximal
    /// run.
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let la = self.a.len();
        let lb = self.b.len();

        // Explicit stack instead of recursion: depth can reach len(a)
        let mut queue = vec![(0usize, la, 0usize, lb)];
        let mut found: Vec<MatchingBlock> = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            found.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        found.sort_unstable();

        let mut blocks: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
        for block in found {
            match blocks.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => blocks.push(block),
            }
        }

        blocks.push(MatchingBlock::new(la, lb, 0));
        blocks
    }

    /// Number of matched elements across all blocks.
    #[must_use]
    pub fn matches(&self) -> usize {
        self.matching_blocks().iter().map(|m| m.size).sum()
    }

    /// Similarity as a float in `[0, 1]`: `2M / (len(a) + len(b))`.
    ///
    /// Two empty sequences are identical and give `1.0`. The scoring
    /// functions in [`super::fuzz`] treat empty input as a score of 0 before
    /// reaching this point.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        calculate_ratio(self.matches(), self.a.len() + self.b.len())
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

/// Scale a `[0, 1]` ratio to an integer score in `[0, 100]`.
///
/// Rounds half to even on the f64 value of `100 * ratio`: `12.5` gives 12,
/// `37.5` gives 38.
#[must_use]
pub fn scale_ratio(ratio: f64) -> u8 {
    (100.0 * ratio).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Matching blocks and ratio for a pair of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Blocks in increasing order, ending with the zero-size sentinel
    pub blocks: Vec<MatchingBlock>,
    /// `2M / T`, or 0 when either side is empty
    pub ratio: f64,
}

impl Alignment {
    /// Ratio scaled to `[0, 100]` with [`scale_ratio`].
    #[must_use]
    pub fn score(&self) -> u8 {
        scale_ratio(self.ratio)
    }

    /// Total number of matched elements.
    #[must_use]
    pub fn matches(&self) -> usize {
        self.blocks.iter().map(|m| m.size).sum()
    }
}

/// Align two strings as sequences of Unicode code points.
///
/// # Examples
/// ```
/// use fuzzylogic::algorithms::matcher::{align, MatchingBlock};
///
/// let alignment = align("abxcd", "abcd");
/// assert_eq!(
///     alignment.blocks,
///     vec![
///         MatchingBlock::new(0, 0, 2),
///         MatchingBlock::new(3, 2, 2),
///         MatchingBlock::new(5, 4, 0),
///     ]
/// );
/// assert_eq!(alignment.score(), 89);
/// ```
#[must_use]
pub fn align(a: &str, b: &str) -> Alignment {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    align_chars(&a_chars, &b_chars)
}

/// [`align`] over pre-split char slices.
#[must_use]
pub fn align_chars(a: &[char], b: &[char]) -> Alignment {
    let blocks = SequenceMatcher::new(a, b).matching_blocks();
    let ratio = if a.is_empty() || b.is_empty() {
        0.0
    } else {
        let matches: usize = blocks.iter().map(|m| m.size).sum();
        calculate_ratio(matches, a.len() + b.len())
    };
    Alignment { blocks, ratio }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_find_longest_match_basic() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 5, 0, 9);
        assert_eq!(m, MatchingBlock::new(0, 4, 5));
    }

    #[test]
    fn test_find_longest_match_tie_prefers_earliest() {
        // "ab" and "cd" both length 2; "ab" starts first in a
        let a = chars("abXcd");
        let b = chars("cdYab");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 5, 0, 5);
        assert_eq!(m, MatchingBlock::new(0, 3, 2));

        // Same start in a, earliest start in b wins
        let a = chars("ab");
        let b = chars("abab");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 2, 0, 4);
        assert_eq!(m, MatchingBlock::new(0, 0, 2));
    }

    #[test]
    fn test_find_longest_match_respects_bounds() {
        let a = chars("abcd");
        let b = chars("abcd");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(1, 4, 2, 4);
        assert_eq!(m, MatchingBlock::new(2, 2, 2));
    }

    #[test]
    fn test_find_longest_match_none() {
        let a = chars("abc");
        let b = chars("xyz");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 3, 0, 3);
        assert_eq!(m, MatchingBlock::new(0, 0, 0));
    }

    #[test]
    fn test_matching_blocks_with_sentinel() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(
            blocks,
            vec![
                MatchingBlock::new(0, 0, 2),
                MatchingBlock::new(3, 2, 2),
                MatchingBlock::new(5, 4, 0),
            ]
        );
    }

    #[test]
    fn test_matching_blocks_no_match_is_sentinel_only() {
        let a = chars("abc");
        let b = chars("xyz");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(blocks, vec![MatchingBlock::new(3, 3, 0)]);
    }

    #[test]
    fn test_matching_blocks_non_overlapping_and_ordered() {
        let a = chars("the quick brown fox");
        let b = chars("quick the fox brown");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        for pair in blocks.windows(2) {
            assert!(pair[0].a + pair[0].size <= pair[1].a);
            assert!(pair[0].b + pair[0].size <= pair[1].b);
        }
    }

    #[test]
    fn test_ratio_identical_and_disjoint() {
        let a = chars("hello");
        assert_eq!(SequenceMatcher::new(&a, &a).ratio(), 1.0);
        let b = chars("world");
        let c = chars("xyz");
        assert_eq!(SequenceMatcher::new(&b, &c).ratio(), 0.0);
    }

    #[test]
    fn test_ratio_both_empty() {
        assert_eq!(SequenceMatcher::new(&[], &[]).ratio(), 1.0);
    }

    #[test]
    fn test_align_empty_is_zero() {
        assert_eq!(align("", "abc").ratio, 0.0);
        assert_eq!(align("", "").score(), 0);
    }

    #[test]
    fn test_scale_ratio_half_to_even() {
        assert_eq!(scale_ratio(0.125), 12);
        assert_eq!(scale_ratio(0.375), 38);
        assert_eq!(scale_ratio(1.0), 100);
        assert_eq!(scale_ratio(0.0), 0);
    }

    #[test]
    fn test_alignment_matches() {
        let alignment = align("abxcd", "abcd");
        assert_eq!(alignment.matches(), 4);
        assert!((alignment.ratio - 8.0 / 9.0).abs() < 1e-12);
    }
}
