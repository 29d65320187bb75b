//! Route definitions for the admin catalog surface.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::parts_admin;
use crate::state::AppState;

/// Routes mounted at `/admin/parts`. Every handler here extracts
/// [`AdminUser`], so the whole subtree rejects unauthenticated callers.
///
/// ```text
/// GET    /                     -> search
/// POST   /                     -> create
/// GET    /stats                -> stats
/// GET    /near-matches         -> near_matches
/// POST   /bulk-delete          -> bulk_delete
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update
/// DELETE /{id}                 -> delete
/// POST   /{id}/image/approve   -> approve_image
/// PUT    /{id}/image           -> set_image
/// DELETE /{id}/image           -> clear_image
/// PUT    /{id}/description     -> set_description
/// DELETE /{id}/description     -> clear_description
/// ```
///
/// [`AdminUser`]: crate::middleware::identity::AdminUser
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parts_admin::search).post(parts_admin::create))
        .route("/stats", get(parts_admin::stats))
        .route("/near-matches", get(parts_admin::near_matches))
        .route("/bulk-delete", post(parts_admin::bulk_delete))
        .route(
            "/{id}",
            get(parts_admin::get_by_id)
                .put(parts_admin::update)
                .delete(parts_admin::delete),
        )
        .route("/{id}/image/approve", post(parts_admin::approve_image))
        .route(
            "/{id}/image",
            put(parts_admin::set_image).delete(parts_admin::clear_image),
        )
        .route(
            "/{id}/description",
            put(parts_admin::set_description).delete(parts_admin::clear_description),
        )
}
