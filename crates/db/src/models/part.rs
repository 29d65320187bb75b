//! Catalog part models and DTOs.

use rotorbase_core::curation;
use rotorbase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Column list for the `catalog_parts` table, shared by the part, curation,
/// and near-match repositories (one row shape, one list).
///
/// The generated `match_name` and `search_vector` columns are deliberately
/// absent; they are query-side only.
pub const PART_COLUMNS: &str = "id, gear_type, brand, model, variant, canonical_key, specs, \
    best_for, msrp_cents, source, created_by, status, description, \
    image_key, image_status, image_curated_by, image_curated_at, \
    description_status, description_curated_by, description_curated_at, \
    created_at, updated_at";

/// A catalog part row.
///
/// The raw image reference (`image_key`) is never serialized; consumers see
/// a visibility-filtered `image_url` through [`PartView`] instead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogPart {
    pub id: DbId,
    pub gear_type: String,
    pub brand: String,
    pub model: String,
    pub variant: Option<String>,
    pub canonical_key: String,
    /// Opaque per-gear-type attributes, passed through unmodified.
    pub specs: Value,
    pub best_for: Vec<String>,
    pub msrp_cents: Option<i64>,
    pub source: String,
    pub created_by: Option<DbId>,
    pub status: String,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub image_key: Option<String>,
    pub image_status: String,
    pub image_curated_by: Option<DbId>,
    pub image_curated_at: Option<Timestamp>,
    pub description_status: String,
    pub description_curated_by: Option<DbId>,
    pub description_curated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payload for submitting a part (create-or-get).
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePart {
    pub gear_type: String,
    pub brand: String,
    pub model: String,
    pub variant: Option<String>,
    pub specs: Option<Value>,
    #[serde(default)]
    pub best_for: Vec<String>,
    pub msrp_cents: Option<i64>,
    /// Optional initial description; stored unapproved (never rendered
    /// publicly) until an admin confirms one.
    pub description: Option<String>,
    /// Provenance override for admin/import ingestion. Public submissions
    /// ignore this and are always recorded as user-submitted.
    pub source: Option<String>,
}

/// Admin metadata patch. Only non-`None` fields are applied.
///
/// `variant` is special-cased: a blank value clears the stored variant,
/// since a blank variant is defined to be identical to an absent one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePart {
    pub gear_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub specs: Option<Value>,
    pub best_for: Option<Vec<String>>,
    pub msrp_cents: Option<i64>,
    pub status: Option<String>,
}

/// Public search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartSearchParams {
    /// Free-text query; when present, results are relevance-ranked.
    pub q: Option<String>,
    pub gear_type: Option<String>,
    /// Case-insensitive exact brand filter.
    pub brand: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin search parameters.
///
/// When none of `status` / `image_status` / `description_status` is given,
/// the search defaults to the "needs work" view: parts whose image is not
/// yet approved or whose description is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSearchParams {
    pub q: Option<String>,
    pub gear_type: Option<String>,
    pub brand: Option<String>,
    pub status: Option<String>,
    pub image_status: Option<String>,
    pub description_status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Near-match lookup parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct NearMatchQuery {
    pub gear_type: String,
    pub brand: String,
    pub model: String,
    /// Similarity threshold for the trigram path; defaults to 0.3.
    pub threshold: Option<f64>,
}

/// A part together with its derived inventory usage count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartWithUsage {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub part: CatalogPart,
    pub usage_count: i64,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub items: Vec<PartWithUsage>,
    pub total_count: i64,
}

/// A near-duplicate candidate with its similarity score.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NearMatch {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub part: CatalogPart,
    pub score: f64,
}

/// Admin dashboard counts over the catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogStats {
    pub total_parts: i64,
    pub pending_parts: i64,
    pub published_parts: i64,
    pub flagged_parts: i64,
    pub rejected_parts: i64,
    /// Scanned images waiting for an admin decision.
    pub images_awaiting_review: i64,
    pub parts_missing_image: i64,
    pub parts_missing_description: i64,
}

/// Outcome of a bulk delete; ids are processed independently.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteOutcome {
    pub deleted: i64,
    /// Ids that had no matching row.
    pub missing: Vec<DbId>,
    /// Ids whose delete failed with a database error.
    pub failed: Vec<DbId>,
}

/// API projection of a part: hides the raw image reference and exposes a
/// trust-filtered asset URL.
#[derive(Debug, Clone, Serialize)]
pub struct PartView {
    #[serde(flatten)]
    pub part: CatalogPart,
    pub usage_count: i64,
    pub image_url: Option<String>,
}

impl PartView {
    /// Projection for public catalog consumers: approved images only.
    pub fn public(part: CatalogPart, usage_count: i64) -> Self {
        let image_url = part
            .image_key
            .as_deref()
            .filter(|_| curation::image_visible_public(&part.image_status))
            .map(curation::asset_url);
        Self {
            part,
            usage_count,
            image_url,
        }
    }

    /// Projection for the submitting flow and admins: scanned images are
    /// visible too.
    pub fn curator(part: CatalogPart, usage_count: i64) -> Self {
        let image_url = part
            .image_key
            .as_deref()
            .filter(|_| curation::image_visible_curator(&part.image_status))
            .map(curation::asset_url);
        Self {
            part,
            usage_count,
            image_url,
        }
    }
}
