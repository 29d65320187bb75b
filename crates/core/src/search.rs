//! Search and near-match constants and helpers.
//!
//! Pagination clamps and tsquery sanitizing for catalog search, plus the
//! scoring rules for near-duplicate detection. The repository layer decides
//! *where* these run (SQL vs Rust); the rules themselves live here so both
//! the trigram path and the heuristic fallback can be tested without a
//! database.

use crate::canonical;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of search results per page.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results per page.
pub const MAX_SEARCH_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Near-match constants
// ---------------------------------------------------------------------------

/// Number of near-match candidates returned.
pub const NEAR_MATCH_LIMIT: i64 = 10;

/// Default trigram similarity threshold for the primary near-match path.
pub const DEFAULT_NEAR_MATCH_THRESHOLD: f64 = 0.3;

pub const MIN_NEAR_MATCH_THRESHOLD: f64 = 0.0;
pub const MAX_NEAR_MATCH_THRESHOLD: f64 = 1.0;

/// Base score every fallback candidate starts with.
pub const FALLBACK_BASE_SCORE: f64 = 0.5;

/// Added when the candidate brand equals the query brand (normalized).
pub const FALLBACK_BRAND_BONUS: f64 = 0.25;

/// Added when the candidate model contains the query model (normalized).
pub const FALLBACK_MODEL_BONUS: f64 = 0.25;

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Sanitize user input into a list of terms suitable for tsquery construction.
///
/// Splits on every character that is not alphanumeric or `_` and drops the
/// empty pieces. Splitting (rather than trimming term edges) matters:
/// punctuation *inside* a token, like `f80!pro`, would otherwise survive
/// into the tsquery string and make Postgres reject the whole query.
///
/// Returns `None` if the input yields no usable terms.
fn sanitize_terms(query: &str) -> Option<Vec<&str>> {
    let terms: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Sanitize and convert user input into a PostgreSQL `tsquery` string.
///
/// - Whitespace-separated terms are joined with `&` (AND).
/// - Empty or whitespace-only input returns `None`.
/// - Special characters that could break tsquery parsing are stripped.
///
/// # Examples
///
/// ```
/// use rotorbase_core::search::build_tsquery;
/// assert_eq!(build_tsquery("crossfire nano"), Some("crossfire & nano".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" & "))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Near-match scoring
// ---------------------------------------------------------------------------

/// Heuristic near-match score used when trigram similarity is unavailable.
///
/// Every candidate (already selected by brand or model match) starts at
/// [`FALLBACK_BASE_SCORE`]; an exact normalized-brand match and a
/// normalized-model substring match each add their bonus, for a maximum of
/// `1.0`. Comparisons run on normalized text so "T-Motor" and "TMOTOR"
/// style differences behave the same as in key derivation.
pub fn fallback_score(
    candidate_brand: &str,
    candidate_model: &str,
    query_brand: &str,
    query_model: &str,
) -> f64 {
    let mut score = FALLBACK_BASE_SCORE;

    if canonical::normalize(candidate_brand) == canonical::normalize(query_brand) {
        score += FALLBACK_BRAND_BONUS;
    }
    if canonical::normalize(candidate_model).contains(&canonical::normalize(query_model)) {
        score += FALLBACK_MODEL_BONUS;
    }

    score
}

/// Validate a caller-supplied similarity threshold.
pub fn validate_threshold(threshold: f64) -> Result<(), CoreError> {
    if !(MIN_NEAR_MATCH_THRESHOLD..=MAX_NEAR_MATCH_THRESHOLD).contains(&threshold) {
        return Err(CoreError::Validation(format!(
            "Similarity threshold must be between {MIN_NEAR_MATCH_THRESHOLD} and {MAX_NEAR_MATCH_THRESHOLD}, got {threshold}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
