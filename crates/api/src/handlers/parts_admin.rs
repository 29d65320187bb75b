//! Handlers for the `/admin/parts` resource.
//!
//! Admin surface: unscoped search with the needs-work default, ingestion,
//! metadata patches, deletion, curation actions, and catalog stats. Every
//! handler requires the forwarded admin identity; responses use the curator
//! projection (scanned images visible).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rotorbase_core::types::DbId;
use rotorbase_core::{curation, gear, CoreError};
use rotorbase_db::models::part::{
    AdminSearchParams, CatalogPart, CreatePart, NearMatchQuery, PartView, UpdatePart,
};
use rotorbase_db::repositories::{CurationRepo, NearMatchRepo, PartRepo};
use rotorbase_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::parts::{PartPage, SubmitImageRequest, SubmitOutcome};
use crate::middleware::identity::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Request body for bulk deletion.
#[derive(Debug, serde::Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

/// Request body for setting a curated description.
#[derive(Debug, serde::Deserialize)]
pub struct SetDescriptionRequest {
    pub description: String,
}

async fn curator_view(pool: &DbPool, part: CatalogPart) -> AppResult<PartView> {
    let usage_count = PartRepo::usage_count(pool, part.id).await?;
    Ok(PartView::curator(part, usage_count))
}

// ---------------------------------------------------------------------------
// Search and ingestion
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/parts
///
/// Admin search across all statuses. Filters: `q`, `gear_type`, `brand`,
/// `status`, `image_status`, `description_status`, `limit`, `offset`. With
/// no status filters at all this is the review worklist (parts still
/// needing image or description attention), oldest first.
pub async fn search(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<AdminSearchParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        gear::validate_status(status)?;
    }
    if let Some(ref image_status) = params.image_status {
        curation::validate_image_status(image_status)?;
    }
    if let Some(ref description_status) = params.description_status {
        curation::validate_description_status(description_status)?;
    }

    let page = PartRepo::admin_search(&state.pool, &params).await?;
    Ok(Json(DataResponse {
        data: PartPage::curator(page),
    }))
}

/// POST /api/v1/admin/parts
///
/// Admin/import ingestion through the same create-or-get semantics as the
/// public route, with a caller-chosen provenance (default `admin`).
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<CreatePart>,
) -> AppResult<impl IntoResponse> {
    let source = input.source.as_deref().unwrap_or(gear::SOURCE_ADMIN);
    let (part, existing) =
        PartRepo::create_or_get(&state.pool, &input, source, Some(admin.admin_id)).await?;

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

/// GET /api/v1/admin/parts/stats
///
/// Catalog-wide curation counts for the dashboard.
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let stats = PartRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/parts/near-matches
///
/// Near-match lookup across every catalog status, for pre-ingestion checks.
pub async fn near_matches(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<NearMatchQuery>,
) -> AppResult<impl IntoResponse> {
    let matches = NearMatchRepo::find(&state.pool, &query, true).await?;
    Ok(Json(DataResponse { data: matches }))
}

// ---------------------------------------------------------------------------
// Single-part CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/parts/{id}
///
/// Single part, curator projection.
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let part = PartRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "catalog_parts",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: PartView::curator(part.part, part.usage_count),
    }))
}

/// PUT /api/v1/admin/parts/{id}
///
/// Patch part metadata. Identity edits recompute the canonical key (409 on
/// collision); setting `status` to `published` promotes a scanned image.
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdatePart>,
) -> AppResult<impl IntoResponse> {
    let part = PartRepo::admin_update(&state.pool, id, &patch, admin.admin_id).await?;
    let view = curator_view(&state.pool, part).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/admin/parts/{id}
///
/// Permanently delete a part. Inventory references are severed, not
/// cascaded.
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = PartRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "catalog_parts",
            id,
        }))
    }
}

/// POST /api/v1/admin/parts/bulk-delete
///
/// Delete many parts; ids are processed independently and the response
/// reports the per-id outcome.
pub async fn bulk_delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = PartRepo::bulk_delete(&state.pool, &body.ids).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Image curation
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/parts/{id}/image/approve
///
/// Approve the current scanned image, stamping the admin as curator.
pub async fn approve_image(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let part = CurationRepo::approve_image(&state.pool, id, admin.admin_id).await?;
    let view = curator_view(&state.pool, part).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/admin/parts/{id}/image
///
/// Attach an admin-provided image, approved immediately.
pub async fn set_image(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
    Json(body): Json<SubmitImageRequest>,
) -> AppResult<impl IntoResponse> {
    let part =
        CurationRepo::set_admin_image(&state.pool, id, &body.image_key, admin.admin_id).await?;
    let view = curator_view(&state.pool, part).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/admin/parts/{id}/image
///
/// Remove the part's image entirely.
pub async fn clear_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let part = CurationRepo::clear_image(&state.pool, id).await?;
    let view = curator_view(&state.pool, part).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Description curation
// ---------------------------------------------------------------------------

/// PUT /api/v1/admin/parts/{id}/description
///
/// Write an approved description.
pub async fn set_description(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
    Json(body): Json<SetDescriptionRequest>,
) -> AppResult<impl IntoResponse> {
    let part =
        CurationRepo::set_description(&state.pool, id, admin.admin_id, &body.description).await?;
    let view = curator_view(&state.pool, part).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/admin/parts/{id}/description
///
/// Remove the description, returning it to `missing`.
pub async fn clear_description(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let part = CurationRepo::clear_description(&state.pool, id).await?;
    let view = curator_view(&state.pool, part).await?;
    Ok(Json(DataResponse { data: view }))
}
