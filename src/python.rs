//! Python bindings (enabled with the `python` feature).
//!
//! Mirrors the Rust API with Python-style defaults. Passing `None` to
//! `ratio` or `partial_ratio` raises `MissingInputError` (a `TypeError`);
//! the normalizing scorers treat `None` as an empty string and score 0.

use crate::algorithms::{fuzz, Algorithm};
use crate::error::FuzzError;
use crate::process::{Choices, Extractor, ScoredChoice};
use pyo3::create_exception;
use pyo3::prelude::*;
use pyo3::types::PyDict;

// ============================================================================
// Custom Python Exceptions
// ============================================================================

create_exception!(fuzzylogic, FuzzyLogicError, pyo3::exceptions::PyException);
create_exception!(fuzzylogic, MissingInputError, pyo3::exceptions::PyTypeError);
create_exception!(fuzzylogic, AlgorithmError, FuzzyLogicError);

impl From<FuzzError> for PyErr {
    fn from(err: FuzzError) -> Self {
        match &err {
            FuzzError::MissingInput { .. } => MissingInputError::new_err(err.to_string()),
            FuzzError::UnknownAlgorithm(_) => AlgorithmError::new_err(err.to_string()),
        }
    }
}

// ============================================================================
// Python Result Types
// ============================================================================

/// A scored choice returned by the extraction functions.
#[pyclass]
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// The matched choice
    #[pyo3(get)]
    pub text: String,

    /// Similarity score (0-100)
    #[pyo3(get)]
    pub score: u8,

    /// Key of the choice when choices were given as a dict
    #[pyo3(get)]
    pub key: Option<String>,
}

#[pymethods]
impl MatchResult {
    #[new]
    #[pyo3(signature = (text, score, key=None))]
    fn new(text: String, score: u8, key: Option<String>) -> Self {
        Self { text, score, key }
    }

    fn __repr__(&self) -> String {
        match &self.key {
            Some(key) => format!(
                "MatchResult(text='{}', score={}, key='{}')",
                self.text, self.score, key
            ),
            None => format!("MatchResult(text='{}', score={})", self.text, self.score),
        }
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.text == other.text && self.score == other.score && self.key == other.key
    }
}

impl From<ScoredChoice<'_, String, String>> for MatchResult {
    fn from(m: ScoredChoice<'_, String, String>) -> Self {
        Self {
            text: m.choice.clone(),
            score: m.score,
            key: m.key.cloned(),
        }
    }
}

/// Choices copied out of a Python list or dict.
enum PyChoices {
    List(Vec<String>),
    Dict(Vec<(String, String)>),
}

impl PyChoices {
    fn from_py(choices: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let Some(choices) = choices else {
            return Ok(PyChoices::List(Vec::new()));
        };
        if let Ok(dict) = choices.downcast::<PyDict>() {
            let mut pairs = Vec::with_capacity(dict.len());
            for (key, value) in dict.iter() {
                pairs.push((key.str()?.extract::<String>()?, value.extract::<String>()?));
            }
            return Ok(PyChoices::Dict(pairs));
        }
        Ok(PyChoices::List(choices.extract::<Vec<String>>()?))
    }

    fn choices(&self) -> Choices<'_, String, String> {
        match self {
            PyChoices::List(items) => Choices::Unnamed(items.as_slice()),
            PyChoices::Dict(pairs) => Choices::named(pairs.iter().map(|(k, v)| (k, v))),
        }
    }
}

fn extractor(scorer: &str, limit: usize) -> PyResult<Extractor> {
    let algorithm: Algorithm = scorer.parse()?;
    Ok(Extractor::new().with_scorer(algorithm).with_limit(limit))
}

// ============================================================================
// Scoring Functions
// ============================================================================

/// Alignment ratio of two strings (0-100). Raises on None.
#[pyfunction]
fn ratio(s1: Option<&str>, s2: Option<&str>) -> PyResult<u8> {
    Ok(fuzz::checked_ratio(s1, s2)?)
}

/// Ratio of the best-matching window of the longer string (0-100). Raises on None.
#[pyfunction]
fn partial_ratio(s1: Option<&str>, s2: Option<&str>) -> PyResult<u8> {
    Ok(fuzz::checked_partial_ratio(s1, s2)?)
}

#[pyfunction]
#[pyo3(signature = (s1, s2, force_ascii=true))]
fn token_sort_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    fuzz::token_sort_ratio(s1, s2, force_ascii)
}

#[pyfunction]
#[pyo3(signature = (s1, s2, force_ascii=true))]
fn partial_token_sort_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    fuzz::partial_token_sort_ratio(s1, s2, force_ascii)
}

#[pyfunction]
#[pyo3(signature = (s1, s2, force_ascii=true))]
fn token_set_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    fuzz::token_set_ratio(s1, s2, force_ascii)
}

#[pyfunction]
#[pyo3(signature = (s1, s2, force_ascii=true))]
fn partial_token_set_ratio(s1: &str, s2: &str, force_ascii: bool) -> u8 {
    fuzz::partial_token_set_ratio(s1, s2, force_ascii)
}

/// Ratio of the normalized strings.
#[pyfunction]
#[pyo3(signature = (s1, s2, force_ascii=true))]
fn qratio(s1: Option<&str>, s2: Option<&str>, force_ascii: bool) -> u8 {
    fuzz::quick_ratio(s1.unwrap_or(""), s2.unwrap_or(""), force_ascii)
}

#[pyfunction]
fn uqratio(s1: Option<&str>, s2: Option<&str>) -> u8 {
    fuzz::uqratio(s1.unwrap_or(""), s2.unwrap_or(""))
}

/// Weighted ratio: best of the other scorers, chosen by relative length.
#[pyfunction]
#[pyo3(signature = (s1, s2, force_ascii=true))]
fn wratio(s1: Option<&str>, s2: Option<&str>, force_ascii: bool) -> u8 {
    fuzz::wratio_with_weights(
        s1.unwrap_or(""),
        s2.unwrap_or(""),
        force_ascii,
        &fuzz::WRatioWeights::default(),
    )
}

#[pyfunction]
fn uwratio(s1: Option<&str>, s2: Option<&str>) -> u8 {
    fuzz::uwratio(s1.unwrap_or(""), s2.unwrap_or(""))
}

#[pyfunction]
#[pyo3(signature = (s, force_ascii=false))]
fn full_process(s: Option<&str>, force_ascii: bool) -> String {
    crate::algorithms::normalize::full_process(s, force_ascii)
}

// ============================================================================
// Extraction Functions
// ============================================================================

/// Find the top `limit` matches in a list or dict of choices.
///
/// # Example
/// ```python
/// >>> extract("new york jets", ["New York Jets", "Dallas Cowboys"], limit=1)
/// [MatchResult(text='New York Jets', score=100)]
/// ```
#[pyfunction]
#[pyo3(signature = (query, choices, scorer="wratio", limit=5))]
fn extract(
    py: Python<'_>,
    query: &str,
    choices: Option<&Bound<'_, PyAny>>,
    scorer: &str,
    limit: usize,
) -> PyResult<Vec<MatchResult>> {
    let extractor = extractor(scorer, limit)?;
    let choices = PyChoices::from_py(choices)?;
    let query = query.to_string();
    Ok(py.allow_threads(|| {
        extractor
            .extract(&query, choices.choices())
            .into_iter()
            .map(MatchResult::from)
            .collect()
    }))
}

/// Like `extract`, keeping only matches scoring above `score_cutoff`.
#[pyfunction]
#[pyo3(signature = (query, choices, scorer="wratio", score_cutoff=0, limit=5))]
fn extract_bests(
    py: Python<'_>,
    query: &str,
    choices: Option<&Bound<'_, PyAny>>,
    scorer: &str,
    score_cutoff: u8,
    limit: usize,
) -> PyResult<Vec<MatchResult>> {
    let extractor = extractor(scorer, limit)?;
    let choices = PyChoices::from_py(choices)?;
    let query = query.to_string();
    Ok(py.allow_threads(|| {
        extractor
            .extract_bests(&query, choices.choices(), score_cutoff)
            .into_iter()
            .map(MatchResult::from)
            .collect()
    }))
}

/// The best match, or None if it scores below `score_cutoff`.
#[pyfunction]
#[pyo3(signature = (query, choices, scorer="wratio", score_cutoff=0))]
fn extract_one(
    py: Python<'_>,
    query: &str,
    choices: Option<&Bound<'_, PyAny>>,
    scorer: &str,
    score_cutoff: u8,
) -> PyResult<Option<MatchResult>> {
    let extractor = extractor(scorer, 1)?;
    let choices = PyChoices::from_py(choices)?;
    let query = query.to_string();
    Ok(py.allow_threads(|| {
        extractor
            .extract_one(&query, choices.choices(), score_cutoff)
            .map(MatchResult::from)
    }))
}

// ============================================================================
// Python Module
// ============================================================================

#[pymodule]
fn _core(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Custom exceptions
    m.add("FuzzyLogicError", py.get_type::<FuzzyLogicError>())?;
    m.add("MissingInputError", py.get_type::<MissingInputError>())?;
    m.add("AlgorithmError", py.get_type::<AlgorithmError>())?;

    m.add_class::<MatchResult>()?;

    m.add_function(wrap_pyfunction!(ratio, m)?)?;
    m.add_function(wrap_pyfunction!(partial_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(token_sort_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(partial_token_sort_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(token_set_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(partial_token_set_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(qratio, m)?)?;
    m.add_function(wrap_pyfunction!(uqratio, m)?)?;
    m.add_function(wrap_pyfunction!(wratio, m)?)?;
    m.add_function(wrap_pyfunction!(uwratio, m)?)?;
    m.add_function(wrap_pyfunction!(full_process, m)?)?;

    m.add_function(wrap_pyfunction!(extract, m)?)?;
    m.add_function(wrap_pyfunction!(extract_bests, m)?)?;
    m.add_function(wrap_pyfunction!(extract_one, m)?)?;

    Ok(())
}
