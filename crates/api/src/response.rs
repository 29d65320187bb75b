//! JSON envelope for successful responses.
//!
//! Every success payload leaves this service as `{ "data": ... }`; failures
//! use the `{ "error", "code" }` shape produced by [`AppError`]. Keeping the
//! envelope as a typed struct (rather than ad-hoc `json!` maps in each
//! handler) means a payload that stops serializing breaks the build, not
//! production.
//!
//! [`AppError`]: crate::error::AppError

use serde::Serialize;

/// The `{ "data": T }` success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
