//! Round-trip tests for `PgArticleRepository` against a live Postgres.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -p db --features integration`.
//! The `article` table is created from `sql/article.sql` if missing.
#![cfg(feature = "integration")]

use std::time::{SystemTime, UNIX_EPOCH};

use db::pool::{create_pool, ping};
use db::{Article, ArticleRepository, DbError, PgArticleRepository};

const SCHEMA: &str = include_str!("../../../sql/article.sql");

async fn repo() -> PgArticleRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = create_pool(&url, 2).await.expect("connect");
    ping(&pool).await.expect("ping");
    sqlx::raw_sql(SCHEMA).execute(&pool).await.expect("create schema");
    PgArticleRepository::new(pool)
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{prefix}-{nanos}")
}

#[tokio::test]
async fn store_then_read_back() {
    let repo = repo().await;
    let title = unique("store");

    let stored = repo.store(&Article::new(&title, "Content")).await.unwrap();
    assert!(stored.id > 0);
    assert_eq!(stored.title, title);
    assert_eq!(stored.content, "Content");

    assert_eq!(repo.get_by_id(stored.id).await.unwrap(), stored);
    assert_eq!(repo.get_by_title(&title).await.unwrap().id, stored.id);
}

#[tokio::test]
async fn fetch_pages_strictly_below_cursor() {
    let repo = repo().await;
    let a = repo.store(&Article::new(unique("page-a"), "")).await.unwrap();
    let b = repo.store(&Article::new(unique("page-b"), "")).await.unwrap();

    let cursor = (b.id + 1).to_string();
    let page = repo.fetch(&cursor, 2).await.unwrap();
    assert_eq!(page.items[0].id, b.id);
    assert_eq!(page.items[1].id, a.id);
    assert_eq!(page.next_cursor, a.id.to_string());

    let older = repo.fetch(&page.next_cursor, 50).await.unwrap();
    assert!(older.items.iter().all(|x| x.id < a.id));
}

#[tokio::test]
async fn fetch_rejects_malformed_cursor() {
    let repo = repo().await;
    assert!(matches!(repo.fetch("nope", 5).await, Err(DbError::BadInput(_))));
}

#[tokio::test]
async fn update_and_delete_require_exactly_one_row() {
    let repo = repo().await;
    let mut stored = repo.store(&Article::new(unique("mutate"), "v1")).await.unwrap();

    stored.content = "v2".into();
    let updated = repo.update(&stored).await.unwrap();
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.created_at, stored.created_at);
    assert_eq!(repo.get_by_id(stored.id).await.unwrap(), updated);

    repo.delete(stored.id).await.unwrap();
    assert!(matches!(repo.get_by_id(stored.id).await, Err(DbError::NotFound)));
    assert!(matches!(
        repo.delete(stored.id).await,
        Err(DbError::AffectedRows { actual: 0, .. })
    ));
    assert!(matches!(
        repo.update(&stored).await,
        Err(DbError::AffectedRows { actual: 0, .. })
    ));
}
