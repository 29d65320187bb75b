//! Domain error taxonomy.
//!
//! Callers are expected to match on these variants: validation and conflict
//! errors are caller mistakes and are surfaced unchanged, never retried.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A rename would land on a canonical key already owned by another part.
    #[error("Canonical key '{key}' already belongs to part {existing_id}")]
    KeyConflict { key: String, existing_id: DbId },

    /// A crowd image submission tried to overwrite an approved image.
    #[error("Part {id} already has an approved image")]
    AlreadyCurated { id: DbId },

    /// Image approval was requested for a part with no image reference.
    #[error("Part {id} has no image to approve")]
    ImageMissing { id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
