//! Canonical key derivation for catalog parts.
//!
//! Many contributors describe the same physical product with different
//! casing, punctuation, and accents ("T-Motor" vs "tmotor", "Crossfire
//! Nano" vs "crossfire-nano"). The canonical key collapses those spellings
//! into one deterministic string so a unique index can turn duplicate
//! submissions into row reuse. No I/O here; everything is a pure function.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::CoreError;

/// Separator between canonical key segments.
///
/// Normalization folds `|` in user text into whitespace, so the separator
/// can never be injected through brand/model/variant input.
pub const KEY_SEPARATOR: char = '|';

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize free text into the canonical token form.
///
/// Steps, in order (each operates on the previous step's output):
/// 1. Unicode NFC composition, so equivalent glyph sequences compare equal.
/// 2. Lowercase.
/// 3. Replace every character that is neither a Unicode letter, a digit,
///    nor whitespace with a single space (folds `-`, `_`, `™`, `.`, quotes
///    and similar into separators).
/// 4. NFD decomposition with combining marks dropped, leaving base letters.
/// 5. Collapse whitespace runs to single spaces and trim.
///
/// The result is idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let lowered = composed.to_lowercase();

    let separated: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let stripped: String = separated
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Key building
// ---------------------------------------------------------------------------

/// Build the canonical dedup key for a part identity.
///
/// `gear_type` is a code-controlled token and is used verbatim; brand,
/// model, and variant are normalized. The variant segment is appended only
/// when its normalized form is non-empty, so a whitespace-only variant
/// produces the same key as no variant at all.
pub fn build_key(gear_type: &str, brand: &str, model: &str, variant: Option<&str>) -> String {
    let mut key = format!(
        "{gear_type}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
        normalize(brand),
        normalize(model)
    );

    if let Some(variant) = variant {
        let normalized = normalize(variant);
        if !normalized.is_empty() {
            key.push(KEY_SEPARATOR);
            key.push_str(&normalized);
        }
    }

    key
}

/// The comparison text used for near-match similarity: normalized brand and
/// model joined by a single space.
///
/// The stored `match_name` column is generated from the canonical key with
/// the same shape, so query-side and row-side text always agree.
pub fn match_name(brand: &str, model: &str) -> String {
    format!("{} {}", normalize(brand), normalize(model))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that brand and model survive normalization.
///
/// A brand or model that normalizes to the empty string (e.g. `"---"`)
/// would produce an empty key segment and collide with every other such
/// submission, so it is rejected before any store access.
pub fn validate_identity(brand: &str, model: &str) -> Result<(), CoreError> {
    if normalize(brand).is_empty() {
        return Err(CoreError::Validation(
            "Brand must contain at least one letter or digit".to_string(),
        ));
    }
    if normalize(model).is_empty() {
        return Err(CoreError::Validation(
            "Model must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
