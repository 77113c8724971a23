//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    /// The caller handed us something we cannot turn into a query,
    /// e.g. a pagination cursor that is not a positive integer.
    #[error("bad input: {0}")]
    BadInput(String),

    /// A keyed write touched a number of rows other than the one expected.
    #[error("unexpected affected row count: expected {expected}, got {actual}")]
    AffectedRows { expected: u64, actual: u64 },

    /// Failure reported by a non-SQL backend.
    #[error("backend error: {0}")]
    Backend(String),
}
