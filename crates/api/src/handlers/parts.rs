//! Handlers for the public `/parts` resource.
//!
//! Contributor-facing surface: part submission (create-or-get), published
//! catalog search, near-match lookup, and image submission. Everything here
//! serializes parts through a [`PartView`] projection so raw image keys and
//! unapproved images never leak to catalog consumers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rotorbase_core::types::DbId;
use rotorbase_core::{gear, CoreError};
use rotorbase_db::models::part::{
    CreatePart, NearMatchQuery, PartSearchParams, PartView, SearchPage,
};
use rotorbase_db::repositories::{CurationRepo, NearMatchRepo, PartRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::identity::Contributor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Response body for part submission.
#[derive(Debug, serde::Serialize)]
pub struct SubmitOutcome {
    /// `true` when the submission merged into an already-catalogued part.
    pub existing: bool,
    pub part: PartView,
}

/// One page of projected search results.
#[derive(Debug, serde::Serialize)]
pub struct PartPage {
    pub items: Vec<PartView>,
    pub total_count: i64,
}

impl PartPage {
    /// Apply the public projection to a raw search page.
    pub fn public(page: SearchPage) -> Self {
        Self {
            total_count: page.total_count,
            items: page
                .items
                .into_iter()
                .map(|p| PartView::public(p.part, p.usage_count))
                .collect(),
        }
    }

    /// Apply the curator projection to a raw search page.
    pub fn curator(page: SearchPage) -> Self {
        Self {
            total_count: page.total_count,
            items: page
                .items
                .into_iter()
                .map(|p| PartView::curator(p.part, p.usage_count))
                .collect(),
        }
    }
}

/// Request body for contributor image submission.
#[derive(Debug, serde::Deserialize)]
pub struct SubmitImageRequest {
    pub image_key: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/parts
///
/// Create-or-get submission. Equivalent identities merge into the existing
/// row (200); genuinely new parts are inserted as `pending` (201). The
/// provenance is always `user-submitted` on this route, whatever the body
/// says.
pub async fn submit(
    State(state): State<AppState>,
    Contributor(user_id): Contributor,
    Json(input): Json<CreatePart>,
) -> AppResult<impl IntoResponse> {
    let (part, existing) =
        PartRepo::create_or_get(&state.pool, &input, gear::SOURCE_USER_SUBMITTED, user_id).await?;

    let status = if existing {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let outcome = SubmitOutcome {
        existing,
        part: PartView::curator(part.part, part.usage_count),
    };
    Ok((status, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/parts
///
/// Public catalog search over published parts. Supports `q` (free text),
/// `gear_type`, `brand`, `limit`, and `offset`.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PartSearchParams>,
) -> AppResult<impl IntoResponse> {
    let page = PartRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse {
        data: PartPage::public(page),
    }))
}

/// GET /api/v1/parts/near-matches
///
/// Find published parts likely identical to a prospective submission.
/// Query: `gear_type`, `brand`, `model`, optional `threshold`.
pub async fn near_matches(
    State(state): State<AppState>,
    Query(query): Query<NearMatchQuery>,
) -> AppResult<impl IntoResponse> {
    let matches = NearMatchRepo::find(&state.pool, &query, false).await?;
    Ok(Json(DataResponse { data: matches }))
}

/// GET /api/v1/parts/{id}
///
/// Single part, public projection: the image URL appears only once the
/// image is approved.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let part = PartRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "catalog_parts",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: PartView::public(part.part, part.usage_count),
    }))
}

/// POST /api/v1/parts/{id}/image
///
/// Contributor image submission. The image lands in `scanned` awaiting
/// review; the response uses the curator projection so the submitter can
/// see what they just uploaded.
pub async fn submit_image(
    State(state): State<AppState>,
    Contributor(_user_id): Contributor,
    Path(id): Path<DbId>,
    Json(body): Json<SubmitImageRequest>,
) -> AppResult<impl IntoResponse> {
    let part = CurationRepo::submit_user_image(&state.pool, id, &body.image_key).await?;
    let usage_count = PartRepo::usage_count(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: PartView::curator(part, usage_count),
    }))
}
