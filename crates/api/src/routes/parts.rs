//! Route definitions for the public parts catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::parts;
use crate::state::AppState;

/// Routes mounted at `/parts`.
///
/// ```text
/// GET    /               -> search
/// POST   /               -> submit
/// GET    /near-matches   -> near_matches
/// GET    /{id}           -> get_by_id
/// POST   /{id}/image     -> submit_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parts::search).post(parts::submit))
        .route("/near-matches", get(parts::near_matches))
        .route("/{id}", get(parts::get_by_id))
        .route("/{id}/image", post(parts::submit_image))
}
