pub mod admin;
pub mod health;
pub mod parts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /parts                            search (public), submit (create-or-get)
/// /parts/near-matches               duplicate check before submission
/// /parts/{id}                       get (public projection)
/// /parts/{id}/image                 contributor image submission (POST)
///
/// /admin/parts                      admin search, create (admin identity)
/// /admin/parts/stats                curation dashboard counts
/// /admin/parts/near-matches         duplicate check across all statuses
/// /admin/parts/bulk-delete          delete many (POST)
/// /admin/parts/{id}                 get, update, delete
/// /admin/parts/{id}/image/approve   approve scanned image (POST)
/// /admin/parts/{id}/image           set approved image, clear (PUT, DELETE)
/// /admin/parts/{id}/description     set approved text, clear (PUT, DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public catalog: submission, search, projections.
        .nest("/parts", parts::router())
        // Admin curation surface.
        .nest("/admin/parts", admin::router())
}
