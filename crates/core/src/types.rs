//! Shared type aliases used across the workspace.

/// Database row identifier (maps to `BIGSERIAL` / `BIGINT`).
pub type DbId = i64;

/// UTC timestamp as stored in `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
