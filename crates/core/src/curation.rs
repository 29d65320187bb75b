//! Image and description curation states.
//!
//! Each part carries two independently curated slots. Images distinguish a
//! machine-scanned upload from an admin-approved one because an untrusted
//! picture on a published part is a real moderation risk; descriptions are
//! plain text and only need missing/approved. Transition rules themselves
//! live in the repository layer where they are enforced transactionally;
//! this module owns the vocabulary and the visibility policy.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Image status constants
// ---------------------------------------------------------------------------

/// No image reference stored.
pub const IMAGE_MISSING: &str = "missing";
/// Crowd-submitted image stored and past automated moderation, awaiting an
/// admin decision.
pub const IMAGE_SCANNED: &str = "scanned";
/// Admin-vetted image, safe for public display.
pub const IMAGE_APPROVED: &str = "approved";

pub const VALID_IMAGE_STATUSES: &[&str] = &[IMAGE_MISSING, IMAGE_SCANNED, IMAGE_APPROVED];

// ---------------------------------------------------------------------------
// Description status constants
// ---------------------------------------------------------------------------

pub const DESCRIPTION_MISSING: &str = "missing";
pub const DESCRIPTION_APPROVED: &str = "approved";

pub const VALID_DESCRIPTION_STATUSES: &[&str] = &[DESCRIPTION_MISSING, DESCRIPTION_APPROVED];

// ---------------------------------------------------------------------------
// Asset visibility
// ---------------------------------------------------------------------------

/// Path prefix under which the image-asset service serves stored bytes.
pub const ASSET_URL_PREFIX: &str = "/assets";

/// URL for a stored image reference.
pub fn asset_url(image_key: &str) -> String {
    format!("{ASSET_URL_PREFIX}/{image_key}")
}

/// Whether an image is visible to public catalog consumers.
pub fn image_visible_public(image_status: &str) -> bool {
    image_status == IMAGE_APPROVED
}

/// Whether an image is visible to the submitting flow and admins.
///
/// Scanned images are shown to these callers so a contributor can see their
/// own upload while it waits for review; they are never served to public
/// search.
pub fn image_visible_curator(image_status: &str) -> bool {
    matches!(image_status, IMAGE_SCANNED | IMAGE_APPROVED)
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that `status` is a known image curation status.
pub fn validate_image_status(status: &str) -> Result<(), CoreError> {
    if VALID_IMAGE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid image status '{status}'. Must be one of: {}",
            VALID_IMAGE_STATUSES.join(", ")
        )))
    }
}

/// Validate that `status` is a known description curation status.
pub fn validate_description_status(status: &str) -> Result<(), CoreError> {
    if VALID_DESCRIPTION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid description status '{status}'. Must be one of: {}",
            VALID_DESCRIPTION_STATUSES.join(", ")
        )))
    }
}

/// Validate an image reference supplied by a caller.
pub fn validate_image_key(image_key: &str) -> Result<(), CoreError> {
    if image_key.trim().is_empty() {
        return Err(CoreError::Validation(
            "Image reference must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate description text supplied by an admin.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Description must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
