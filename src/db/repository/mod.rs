//! Repository layer: entity-scoped database operations.

mod profile;
mod report;

pub use profile::*;
pub use report::*;

use super::DatabaseError;

/// Map SQLite constraint failures (duplicate key, check, foreign key) to
/// [`DatabaseError::ConstraintViolation`].
fn constraint_or_sqlite(e: rusqlite::Error) -> DatabaseError {
    match e {
        rusqlite::Error::SqliteFailure(ref failure, ref message)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(
                message.clone().unwrap_or_else(|| failure.to_string()),
            )
        }
        other => DatabaseError::Sqlite(other),
    }
}
