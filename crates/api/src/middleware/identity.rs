//! Gateway-forwarded identity extractors for Axum handlers.
//!
//! Authentication itself lives at the edge gateway; this service trusts the
//! identity headers the gateway forwards. Contributor identity is optional
//! everywhere, admin identity is mandatory on `/admin` routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rotorbase_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the optional contributor id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the admin id on `/admin` routes.
pub const ADMIN_ID_HEADER: &str = "x-admin-id";

/// Optional contributor identity from the `x-user-id` header.
///
/// An absent header is fine (anonymous submission); a present but
/// non-numeric one is rejected with 400 so a broken gateway shows up
/// instead of silently anonymizing everyone.
///
/// ```ignore
/// async fn submit(Contributor(user_id): Contributor) -> AppResult<Json<()>> {
///     tracing::info!(?user_id, "handling submission");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Contributor(pub Option<DbId>);

impl FromRequestParts<AppState> for Contributor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Contributor(None));
        };

        let user_id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("{USER_ID_HEADER} must be an integer id"))
            })?;

        Ok(Contributor(Some(user_id)))
    }
}

/// Required admin identity from the `x-admin-id` header.
///
/// Use as an extractor parameter in every admin handler; requests without a
/// usable admin id are rejected with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// The admin's id as forwarded by the gateway.
    pub admin_id: DbId,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin_id = parts
            .headers
            .get(ADMIN_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Missing or invalid {ADMIN_ID_HEADER} header"))
            })?;

        Ok(AdminUser { admin_id })
    }
}
