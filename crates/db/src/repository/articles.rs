//! Postgres implementation of [`ArticleRepository`].

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::{expect_single_row, ArticleRepository};
use crate::cursor::{decode_cursor, next_cursor};
use crate::{Article, ArticlePage, DbError};

const SELECT_PAGE: &str = r#"
    SELECT id, title, content, updated_at, created_at
    FROM article
    ORDER BY id DESC
    LIMIT $1
"#;

const SELECT_PAGE_BEFORE: &str = r#"
    SELECT id, title, content, updated_at, created_at
    FROM article
    WHERE id < $1
    ORDER BY id DESC
    LIMIT $2
"#;

/// Article repository backed by a shared Postgres pool.
#[derive(Debug, Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn fetch(&self, cursor: &str, limit: u32) -> Result<ArticlePage, DbError> {
        let before = decode_cursor(cursor)?;
        let limit = i64::from(limit);

        let items: Vec<Article> = match before {
            Some(before) => {
                sqlx::query_as(SELECT_PAGE_BEFORE)
                    .bind(before)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as(SELECT_PAGE)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(count = items.len(), cursor, "fetched article page");
        let next_cursor = next_cursor(cursor, items.last().map(|a| a.id));
        Ok(ArticlePage { items, next_cursor })
    }

    async fn get_by_id(&self, id: i64) -> Result<Article, DbError> {
        let row = sqlx::query_as(
            r#"SELECT id, title, content, updated_at, created_at FROM article WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(row)
    }

    async fn get_by_title(&self, title: &str) -> Result<Article, DbError> {
        let row = sqlx::query_as(
            r#"
            SELECT id, title, content, updated_at, created_at
            FROM article
            WHERE title = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(row)
    }

    async fn store(&self, article: &Article) -> Result<Article, DbError> {
        let now = Utc::now();

        let row: Article = sqlx::query_as(
            r#"
            INSERT INTO article (title, content, updated_at, created_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, title, content, updated_at, created_at
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, "stored article");
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM article WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_single_row(result.rows_affected()).inspect_err(|e| {
            warn!(id, "delete: {e}");
        })
    }

    async fn update(&self, article: &Article) -> Result<Article, DbError> {
        let rows: Vec<Article> = sqlx::query_as(
            r#"
            UPDATE article
            SET title = $1, content = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, title, content, updated_at, created_at
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.updated_at)
        .bind(article.id)
        .fetch_all(&self.pool)
        .await?;

        match <[Article; 1]>::try_from(rows) {
            Ok([row]) => Ok(row),
            Err(rows) => {
                let e = DbError::AffectedRows { expected: 1, actual: rows.len() as u64 };
                warn!(id = article.id, "update: {e}");
                Err(e)
            }
        }
    }
}
