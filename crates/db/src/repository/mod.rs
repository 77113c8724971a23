//! The article repository contract and its implementations.
//!
//! Every method returns a `Result<T, DbError>`.  Only `NotFound` and
//! `BadInput` are distinguished; everything else is an internal failure.
//! No business logic lives behind this trait: uniqueness and existence
//! rules belong to the caller.

use async_trait::async_trait;

use crate::{Article, ArticlePage, DbError};

pub mod articles;
pub mod memory;

pub use articles::PgArticleRepository;
pub use memory::MemoryArticleRepository;

/// Data access for the `article` table.
///
/// Implementations must be safe to share between concurrent requests.
/// Cancellation is by drop: a caller that stops polling a returned future
/// aborts the in-flight call.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Up to `limit` articles ordered by `id` descending, restricted to
    /// `id < cursor` when `cursor` is non-empty.
    ///
    /// # Errors
    /// [`DbError::BadInput`] when `cursor` is non-empty and not a positive integer.
    async fn fetch(&self, cursor: &str, limit: u32) -> Result<ArticlePage, DbError>;

    /// # Errors
    /// [`DbError::NotFound`] when no row has this id.
    async fn get_by_id(&self, id: i64) -> Result<Article, DbError>;

    /// # Errors
    /// [`DbError::NotFound`] when no row has this title.
    async fn get_by_title(&self, title: &str) -> Result<Article, DbError>;

    /// Insert `article` with fresh server timestamps and return the stored
    /// row, carrying its generated `id`.  The input `id` is ignored.
    async fn store(&self, article: &Article) -> Result<Article, DbError>;

    /// Hard-delete the row with this id.
    ///
    /// # Errors
    /// [`DbError::AffectedRows`] unless exactly one row was removed.
    async fn delete(&self, id: i64) -> Result<(), DbError>;

    /// Overwrite `title`, `content` and `updated_at` of the row keyed by
    /// `article.id` and return the row as stored (with its original
    /// `created_at`).
    ///
    /// # Errors
    /// [`DbError::AffectedRows`] unless exactly one row was changed.
    async fn update(&self, article: &Article) -> Result<Article, DbError>;
}

/// Fail with [`DbError::AffectedRows`] unless exactly one row was touched.
pub(crate) fn expect_single_row(actual: u64) -> Result<(), DbError> {
    if actual != 1 {
        return Err(DbError::AffectedRows { expected: 1, actual });
    }
    Ok(())
}
