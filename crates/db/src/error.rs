//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Connection, query or decode failure reported by sqlx.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// No row matched the lookup key.
    #[error("row not found")]
    NotFound,

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
