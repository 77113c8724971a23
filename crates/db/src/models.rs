//! Row structs that map 1-to-1 onto database tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// article
// ---------------------------------------------------------------------------

/// A persisted article row.
///
/// `id` is assigned by the store and is `0` until the article has been
/// stored.  Timestamps are server-assigned on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Build an article that has not been stored yet.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: title.into(),
            content: content.into(),
            updated_at: now,
            created_at: now,
        }
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    /// Articles ordered by `id`, newest first.
    pub items: Vec<Article>,
    /// Cursor for the next page: the id of the last item, or the request
    /// cursor unchanged when `items` is empty.
    pub next_cursor: String,
}
