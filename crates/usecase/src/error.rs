//! Usecase-level error types.

use std::time::Duration;

use thiserror::Error;

use db::DbError;

/// Coarse classification a front end maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadInput,
    NotFound,
    Conflict,
    Internal,
}

/// Errors produced by [`crate::ArticleUsecase`].
#[derive(Debug, Error)]
pub enum ArticleError {
    /// Malformed client input, e.g. an unparsable pagination cursor.
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("article not found")]
    NotFound,

    /// Another live article already uses this title.
    #[error("title already used")]
    Conflict,

    /// The execution deadline passed before the store answered.
    #[error("deadline exceeded after {0:?}")]
    Timeout(Duration),

    /// Any other persistence failure.
    #[error("database error: {0}")]
    Database(DbError),
}

impl ArticleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadInput(_) => ErrorKind::BadInput,
            Self::NotFound => ErrorKind::NotFound,
            Self::Conflict => ErrorKind::Conflict,
            Self::Timeout(_) | Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<DbError> for ArticleError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => Self::NotFound,
            DbError::BadInput(msg) => Self::BadInput(msg),
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_keep_their_distinguished_kinds() {
        assert_eq!(ArticleError::from(DbError::NotFound).kind(), ErrorKind::NotFound);
        assert_eq!(
            ArticleError::from(DbError::BadInput("cursor".into())).kind(),
            ErrorKind::BadInput
        );
        assert_eq!(
            ArticleError::from(DbError::AffectedRows { expected: 1, actual: 3 }).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn timeout_is_internal() {
        assert_eq!(ArticleError::Timeout(Duration::from_secs(2)).kind(), ErrorKind::Internal);
    }
}
