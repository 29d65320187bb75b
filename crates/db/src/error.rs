//! Repository error type and Postgres error classification helpers.

use rotorbase_core::CoreError;

/// Error returned by repository operations.
///
/// Domain rule failures (`Core`) and driver/database failures (`Sqlx`) are
/// kept distinct so the HTTP layer can map each onto its own status code.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// True when `err` is a Postgres unique violation on `constraint`.
///
/// Used by the create-or-get race recovery: an insert that loses to a
/// concurrent equivalent submission fails with 23505 on the canonical-key
/// constraint, and only that specific failure triggers the re-read.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
