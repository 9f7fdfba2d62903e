//! Extract the best-scoring choices for a query.
//!
//! A choice collection is either a plain list or a keyed mapping (see
//! [`Choices`]). Each choice is turned into text by a [`Processor`], scored
//! against the query by a [`Scorer`], and the results are stably sorted by
//! descending score so that equal scores keep collection order.

use crate::algorithms::normalize::{full_process, FullProcess};
use crate::algorithms::{Algorithm, Scorer};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Default number of results returned by [`Extractor::extract`].
pub const DEFAULT_LIMIT: usize = 5;

/// Minimum number of choices for parallel scoring.
///
/// For smaller collections, sequential scoring is faster due to the
/// overhead of thread pool coordination.
pub const PARALLEL_THRESHOLD: usize = 100;

/// A collection of choices to match against.
///
/// `Unnamed` holds a list; `Named` holds key/choice pairs, and each result
/// carries its key through unchanged. An empty collection (including
/// [`Choices::default`]) produces an empty result.
#[derive(Debug, Clone)]
pub enum Choices<'a, T, K = ()> {
    Unnamed(&'a [T]),
    Named(Vec<(&'a K, &'a T)>),
}

impl<'a, T> Choices<'a, T, ()> {
    #[must_use]
    pub fn list(choices: &'a [T]) -> Self {
        Choices::Unnamed(choices)
    }
}

impl<'a, T, K> Choices<'a, T, K> {
    /// Keyed choices, in iteration order.
    pub fn named<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, &'a T)>,
    {
        Choices::Named(pairs.into_iter().collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Choices::Unnamed(items) => items.len(),
            Choices::Named(pairs) => pairs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, K> Default for Choices<'_, T, K> {
    fn default() -> Self {
        Choices::Unnamed(&[])
    }
}

impl<'a, T> From<&'a [T]> for Choices<'a, T, ()> {
    fn from(choices: &'a [T]) -> Self {
        Choices::Unnamed(choices)
    }
}

impl<'a, T> From<&'a Vec<T>> for Choices<'a, T, ()> {
    fn from(choices: &'a Vec<T>) -> Self {
        Choices::Unnamed(choices.as_slice())
    }
}

impl<'a, K, T> From<&'a BTreeMap<K, T>> for Choices<'a, T, K> {
    fn from(choices: &'a BTreeMap<K, T>) -> Self {
        Choices::named(choices.iter())
    }
}

impl<'a, K, T, H> From<&'a HashMap<K, T, H>> for Choices<'a, T, K> {
    fn from(choices: &'a HashMap<K, T, H>) -> Self {
        Choices::named(choices.iter())
    }
}

/// A choice with its score, and its key when the collection was keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredChoice<'a, T, K = ()> {
    pub choice: &'a T,
    pub score: u8,
    pub key: Option<&'a K>,
}

/// Turns a choice into the text handed to the scorer.
///
/// Implemented by [`FullProcess`] for anything string-like and by any
/// `Fn(&T) -> String`, e.g. a closure that picks one field of a record.
pub trait Processor<T: ?Sized>: Sync {
    fn process(&self, choice: &T) -> String;
}

impl<T> Processor<T> for FullProcess
where
    T: AsRef<str> + ?Sized,
{
    fn process(&self, choice: &T) -> String {
        full_process(choice.as_ref(), self.force_ascii)
    }
}

impl<T, F> Processor<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> String + Sync,
{
    fn process(&self, choice: &T) -> String {
        self(choice)
    }
}

/// Scores a collection of choices against a query and ranks them.
///
/// Defaults: choices are cleaned with [`full_process`] (Unicode preserved),
/// scored with [`Algorithm::WRatio`] (ASCII-coercing), and the top
/// [`DEFAULT_LIMIT`] are kept.
///
/// # Examples
/// ```
/// use fuzzylogic::process::{Choices, Extractor};
/// use fuzzylogic::algorithms::Algorithm;
///
/// let teams = ["Atlanta Falcons", "New York Jets", "New York Giants", "Dallas Cowboys"];
/// let best = Extractor::new()
///     .with_scorer(Algorithm::WRatio { force_ascii: true })
///     .with_limit(2)
///     .extract("new york jets", Choices::list(&teams));
/// assert_eq!(*best[0].choice, "New York Jets");
/// assert_eq!(best[0].score, 100);
/// assert_eq!(best.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Extractor<P = FullProcess, S = Algorithm> {
    processor: P,
    scorer: S,
    limit: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            processor: FullProcess::default(),
            scorer: Algorithm::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Extractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P, S> Extractor<P, S> {
    /// Replace the processor applied to each choice.
    #[must_use]
    pub fn with_processor<P2>(self, processor: P2) -> Extractor<P2, S> {
        Extractor {
            processor,
            scorer: self.scorer,
            limit: self.limit,
        }
    }

    /// Replace the scorer.
    #[must_use]
    pub fn with_scorer<S2: Scorer>(self, scorer: S2) -> Extractor<P, S2> {
        Extractor {
            processor: self.processor,
            scorer,
            limit: self.limit,
        }
    }

    /// Maximum number of results; 0 always yields an empty result.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<P, S: Scorer> Extractor<P, S> {
    /// Score every choice and return the top `limit`, best first.
    ///
    /// Ties keep the order of the collection.
    pub fn extract<'a, T, K>(
        &self,
        query: &str,
        choices: Choices<'a, T, K>,
    ) -> Vec<ScoredChoice<'a, T, K>>
    where
        P: Processor<T>,
        T: Sync,
        K: Sync,
    {
        self.extract_limited(query, choices, self.limit)
    }

    /// Like [`extract`](Self::extract), then keep the leading results whose
    /// score is above `score_cutoff`, stopping at the first one at or below it.
    pub fn extract_bests<'a, T, K>(
        &self,
        query: &str,
        choices: Choices<'a, T, K>,
        score_cutoff: u8,
    ) -> Vec<ScoredChoice<'a, T, K>>
    where
        P: Processor<T>,
        T: Sync,
        K: Sync,
    {
        let mut best = self.extract(query, choices);
        let keep = best.iter().take_while(|m| m.score > score_cutoff).count();
        best.truncate(keep);
        best
    }

    /// The single best choice, if its score is at least `score_cutoff`.
    pub fn extract_one<'a, T, K>(
        &self,
        query: &str,
        choices: Choices<'a, T, K>,
        score_cutoff: u8,
    ) -> Option<ScoredChoice<'a, T, K>>
    where
        P: Processor<T>,
        T: Sync,
        K: Sync,
    {
        self.extract_limited(query, choices, 1)
            .into_iter()
            .next()
            .filter(|m| m.score >= score_cutoff)
    }

    fn extract_limited<'a, T, K>(
        &self,
        query: &str,
        choices: Choices<'a, T, K>,
        limit: usize,
    ) -> Vec<ScoredChoice<'a, T, K>>
    where
        P: Processor<T>,
        T: Sync,
        K: Sync,
    {
        if choices.is_empty() || limit == 0 {
            return Vec::new();
        }

        let parallel = choices.len() >= PARALLEL_THRESHOLD;
        tracing::debug!(
            choices = choices.len(),
            limit,
            scorer = self.scorer.name(),
            parallel,
            "extracting best matches"
        );

        // Both paths collect in collection order, so the stable sort below
        // gives the same ranking either way
        let mut results: Vec<ScoredChoice<'a, T, K>> = match choices {
            Choices::Unnamed(items) if parallel => items
                .par_iter()
                .map(|choice| self.score_choice(query, choice, None))
                .collect(),
            Choices::Unnamed(items) => items
                .iter()
                .map(|choice| self.score_choice(query, choice, None))
                .collect(),
            Choices::Named(pairs) if parallel => pairs
                .par_iter()
                .map(|&(key, choice)| self.score_choice(query, choice, Some(key)))
                .collect(),
            Choices::Named(pairs) => pairs
                .iter()
                .map(|&(key, choice)| self.score_choice(query, choice, Some(key)))
                .collect(),
        };

        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);
        results
    }

    fn score_choice<'a, T, K>(
        &self,
        query: &str,
        choice: &'a T,
        key: Option<&'a K>,
    ) -> ScoredChoice<'a, T, K>
    where
        P: Processor<T>,
    {
        let processed = self.processor.process(choice);
        let score = self.scorer.score(query, &processed);
        ScoredChoice { choice, score, key }
    }
}

/// Top `limit` choices using the default processor and scorer.
pub fn extract<'a, T, K>(
    query: &str,
    choices: Choices<'a, T, K>,
    limit: usize,
) -> Vec<ScoredChoice<'a, T, K>>
where
    T: AsRef<str> + Sync,
    K: Sync,
{
    Extractor::new().with_limit(limit).extract(query, choices)
}

/// Top `limit` choices scoring above `score_cutoff`, using the defaults.
pub fn extract_bests<'a, T, K>(
    query: &str,
    choices: Choices<'a, T, K>,
    score_cutoff: u8,
    limit: usize,
) -> Vec<ScoredChoice<'a, T, K>>
where
    T: AsRef<str> + Sync,
    K: Sync,
{
    Extractor::new()
        .with_limit(limit)
        .extract_bests(query, choices, score_cutoff)
}

/// Best choice scoring at least `score_cutoff`, using the defaults.
pub fn extract_one<'a, T, K>(
    query: &str,
    choices: Choices<'a, T, K>,
    score_cutoff: u8,
) -> Option<ScoredChoice<'a, T, K>>
where
    T: AsRef<str> + Sync,
    K: Sync,
{
    Extractor::new().extract_one(query, choices, score_cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::fuzz;

    static TEAMS: [&str; 4] = [
        "Atlanta Falcons",
        "New York Jets",
        "New York Giants",
        "Dallas Cowboys",
    ];

    #[test]
    fn test_extract_sorted_and_limited() {
        let results = extract("new york", Choices::list(&TEAMS), 3);
        assert_eq!(results.len(), 3);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results[0].choice.starts_with("New York"));
        assert!(results[1].choice.starts_with("New York"));
    }

    #[test]
    fn test_extract_empty_choices() {
        let empty: [&str; 0] = [];
        assert!(extract("query", Choices::list(&empty), 5).is_empty());
        assert!(extract::<&str, ()>("query", Choices::default(), 5).is_empty());
    }

    #[test]
    fn test_extract_zero_limit() {
        assert!(extract("new york", Choices::list(&TEAMS), 0).is_empty());
    }

    #[test]
    fn test_limit_survives_builder_chain() {
        assert_eq!(Extractor::new().limit(), DEFAULT_LIMIT);

        let extractor = Extractor::new()
            .with_limit(2)
            .with_scorer(Algorithm::Ratio)
            .with_processor(FullProcess::new(true));
        assert_eq!(extractor.limit(), 2);
        assert_eq!(extractor.extract("new york", Choices::list(&TEAMS)).len(), 2);
    }

    #[test]
    fn test_extract_ties_keep_collection_order() {
        let choices = ["b", "a", "c", "d"];
        let constant = |_: &str, _: &str| -> u8 { 50 };
        let results = Extractor::new()
            .with_scorer(constant)
            .with_limit(10)
            .extract("x", Choices::list(&choices));
        let order: Vec<&str> = results.iter().map(|m| *m.choice).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_extract_named_carries_key() {
        let mut map = BTreeMap::new();
        map.insert(1u32, "New York Jets");
        map.insert(2u32, "Dallas Cowboys");
        let results = extract("jets", Choices::from(&map), 5);
        assert_eq!(results[0].key, Some(&1));
        assert_eq!(*results[0].choice, "New York Jets");
        assert_eq!(results[1].key, Some(&2));
    }

    #[test]
    fn test_custom_processor_sees_raw_choice() {
        struct Team {
            name: &'static str,
            city: &'static str,
        }
        let teams = [
            Team { name: "Jets", city: "New York" },
            Team { name: "Cowboys", city: "Dallas" },
        ];
        let best = Extractor::new()
            .with_processor(|t: &Team| format!("{} {}", t.city, t.name))
            .extract_one("dallas cowboys", Choices::list(&teams), 0)
            .unwrap();
        assert_eq!(best.choice.name, "Cowboys");
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_processor_output_reaches_scorer() {
        // ratio does no cleaning, so only the processor can make these equal
        let choices = ["NEW-YORK"];
        let best = Extractor::new()
            .with_scorer(fuzz::ratio as fn(&str, &str) -> u8)
            .extract_one("new york", Choices::list(&choices), 0)
            .unwrap();
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_extract_bests_cutoff_is_prefix() {
        let choices = ["abc", "abd", "xyz"];
        let results = Extractor::new()
            .with_scorer(Algorithm::Ratio)
            .with_limit(10)
            .extract_bests("abc", Choices::list(&choices), 0);
        // "xyz" scores 0, which is not above the cutoff
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, 100);
        assert_eq!(results[1].score, 67);

        let strict = Extractor::new()
            .with_scorer(Algorithm::Ratio)
            .extract_bests("abc", Choices::list(&choices), 67);
        assert_eq!(strict.len(), 1);
    }

    #[test]
    fn test_extract_one_cutoff() {
        let best = extract_one("new york jets", Choices::list(&TEAMS), 0).unwrap();
        assert_eq!(*best.choice, "New York Jets");
        assert_eq!(best.score, 100);

        assert!(extract_one("new york jets", Choices::list(&TEAMS), 100).is_some());
        assert!(extract_one("new york jets", Choices::list(&TEAMS), 101).is_none());
    }

    #[test]
    fn test_extract_one_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(extract_one("x", Choices::from(&empty), 0).is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let choices: Vec<String> = (0..PARALLEL_THRESHOLD * 2)
            .map(|i| format!("item number {}", i % 37))
            .collect();
        let parallel = Extractor::new()
            .with_limit(choices.len())
            .extract("item number 12", Choices::list(&choices));

        let mut sequential: Vec<(usize, u8)> = choices
            .iter()
            .enumerate()
            .map(|(i, c)| (i, fuzz::wratio("item number 12", &full_process(c.as_str(), false))))
            .collect();
        sequential.sort_by(|a, b| b.1.cmp(&a.1));

        let got: Vec<(*const String, u8)> = parallel
            .iter()
            .map(|m| (m.choice as *const String, m.score))
            .collect();
        let want: Vec<(*const String, u8)> = sequential
            .iter()
            .map(|&(i, s)| (&choices[i] as *const String, s))
            .collect();
        assert_eq!(got, want);
    }
}
