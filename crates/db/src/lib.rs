//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, the `article` row struct, the pagination
//! cursor codec and the [`ArticleRepository`] contract with a Postgres and
//! an in-memory implementation.  No business logic lives here.

pub mod cursor;
pub mod error;
pub mod models;
pub mod pool;
pub mod repository;

pub use error::DbError;
pub use models::{Article, ArticlePage};
pub use pool::DbPool;
pub use repository::{ArticleRepository, MemoryArticleRepository, PgArticleRepository};
