//! Gear taxonomy, provenance, and part lifecycle statuses.
//!
//! Statuses are stored as TEXT and mirrored here as constants; validators
//! reject unknown values before anything reaches the store.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Gear type constants
// ---------------------------------------------------------------------------

pub const GEAR_MOTOR: &str = "motor";
pub const GEAR_ESC: &str = "esc";
pub const GEAR_FC: &str = "fc";
pub const GEAR_AIO: &str = "aio";
pub const GEAR_FRAME: &str = "frame";
pub const GEAR_VTX: &str = "vtx";
pub const GEAR_RECEIVER: &str = "receiver";
pub const GEAR_ANTENNA: &str = "antenna";
pub const GEAR_BATTERY: &str = "battery";
pub const GEAR_PROP: &str = "prop";
pub const GEAR_RADIO: &str = "radio";
pub const GEAR_CAMERA: &str = "camera";
pub const GEAR_OTHER: &str = "other";

pub const VALID_GEAR_TYPES: &[&str] = &[
    GEAR_MOTOR,
    GEAR_ESC,
    GEAR_FC,
    GEAR_AIO,
    GEAR_FRAME,
    GEAR_VTX,
    GEAR_RECEIVER,
    GEAR_ANTENNA,
    GEAR_BATTERY,
    GEAR_PROP,
    GEAR_RADIO,
    GEAR_CAMERA,
    GEAR_OTHER,
];

// ---------------------------------------------------------------------------
// Moderation status constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_FLAGGED: &str = "flagged";
pub const STATUS_REJECTED: &str = "rejected";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_PUBLISHED,
    STATUS_FLAGGED,
    STATUS_REJECTED,
];

// ---------------------------------------------------------------------------
// Provenance constants
// ---------------------------------------------------------------------------

pub const SOURCE_USER_SUBMITTED: &str = "user-submitted";
pub const SOURCE_ADMIN: &str = "admin";
pub const SOURCE_IMPORT: &str = "import";
pub const SOURCE_MIGRATION: &str = "migration";

pub const VALID_SOURCES: &[&str] = &[
    SOURCE_USER_SUBMITTED,
    SOURCE_ADMIN,
    SOURCE_IMPORT,
    SOURCE_MIGRATION,
];

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that `gear_type` is one of the known gear types.
pub fn validate_gear_type(gear_type: &str) -> Result<(), CoreError> {
    if VALID_GEAR_TYPES.contains(&gear_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid gear type '{gear_type}'. Must be one of: {}",
            VALID_GEAR_TYPES.join(", ")
        )))
    }
}

/// Validate that `status` is one of the allowed moderation statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate that `source` is one of the allowed provenance values.
pub fn validate_source(source: &str) -> Result<(), CoreError> {
    if VALID_SOURCES.contains(&source) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid source '{source}'. Must be one of: {}",
            VALID_SOURCES.join(", ")
        )))
    }
}

/// Validate an MSRP amount in cents (must be non-negative when present).
pub fn validate_msrp_cents(msrp_cents: i64) -> Result<(), CoreError> {
    if msrp_cents < 0 {
        return Err(CoreError::Validation(format!(
            "MSRP must be non-negative, got {msrp_cents}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
