//! `MemoryArticleRepository` — an in-process [`ArticleRepository`].
//!
//! Honours the same contract as the Postgres implementation (descending-id
//! cursor pagination, affected-row checks) without a database.  Besides
//! serving as a throwaway backend it records every call it receives and can
//! be told to misbehave, which is what the usecase and HTTP tests rely on.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{expect_single_row, ArticleRepository};
use crate::cursor::{decode_cursor, next_cursor};
use crate::{Article, ArticlePage, DbError};

/// Repository operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    GetById,
    GetByTitle,
    Store,
    Delete,
    Update,
}

/// One recorded call, in the order received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch { cursor: String, limit: u32 },
    GetById(i64),
    GetByTitle(String),
    Store { title: String },
    Delete(i64),
    Update(i64),
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Fetch { .. } => Operation::Fetch,
            Self::GetById(_) => Operation::GetById,
            Self::GetByTitle(_) => Operation::GetByTitle,
            Self::Store { .. } => Operation::Store,
            Self::Delete(_) => Operation::Delete,
            Self::Update(_) => Operation::Update,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<i64, Article>,
    last_id: i64,
    calls: Vec<Call>,
    failures: HashMap<Operation, String>,
    forced_affected_rows: Option<u64>,
}

/// Article repository held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryArticleRepository {
    state: Mutex<State>,
    latency: Option<Duration>,
}

impl MemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching the data, so callers
    /// can exercise their deadlines.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert rows as-is, keeping their ids.  Later stores continue after
    /// the highest seeded id.
    pub async fn seed(&self, articles: impl IntoIterator<Item = Article>) {
        let mut state = self.state.lock().await;
        for article in articles {
            state.last_id = state.last_id.max(article.id);
            state.rows.insert(article.id, article);
        }
    }

    /// Make every subsequent call to `op` fail with [`DbError::Backend`].
    pub async fn fail_on(&self, op: Operation, message: impl Into<String>) {
        self.state.lock().await.failures.insert(op, message.into());
    }

    /// Report `count` affected rows from deletes and updates regardless of
    /// what actually matched, mimicking a misbehaving driver.
    pub async fn force_affected_rows(&self, count: u64) {
        self.state.lock().await.forced_affected_rows = Some(count);
    }

    /// All calls received so far.
    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls received for `op`.
    pub async fn call_count(&self, op: Operation) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.operation() == op)
            .count()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Record `call`, honour the configured latency and any injected failure,
    /// then hand back the locked state.
    async fn enter(&self, call: Call) -> Result<tokio::sync::MutexGuard<'_, State>, DbError> {
        let op = call.operation();
        self.state.lock().await.calls.push(call);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let state = self.state.lock().await;
        if let Some(message) = state.failures.get(&op) {
            return Err(DbError::Backend(message.clone()));
        }
        Ok(state)
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn fetch(&self, cursor: &str, limit: u32) -> Result<ArticlePage, DbError> {
        let state = self
            .enter(Call::Fetch { cursor: cursor.to_owned(), limit })
            .await?;
        let before = decode_cursor(cursor)?;

        let items: Vec<Article> = state
            .rows
            .values()
            .rev()
            .filter(|a| before.map_or(true, |b| a.id < b))
            .take(limit as usize)
            .cloned()
            .collect();

        let next_cursor = next_cursor(cursor, items.last().map(|a| a.id));
        Ok(ArticlePage { items, next_cursor })
    }

    async fn get_by_id(&self, id: i64) -> Result<Article, DbError> {
        let state = self.enter(Call::GetById(id)).await?;
        state.rows.get(&id).cloned().ok_or(DbError::NotFound)
    }

    async fn get_by_title(&self, title: &str) -> Result<Article, DbError> {
        let state = self.enter(Call::GetByTitle(title.to_owned())).await?;
        state
            .rows
            .values()
            .rev()
            .find(|a| a.title == title)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn store(&self, article: &Article) -> Result<Article, DbError> {
        let mut state = self
            .enter(Call::Store { title: article.title.clone() })
            .await?;

        state.last_id += 1;
        let now = Utc::now();
        let stored = Article {
            id: state.last_id,
            title: article.title.clone(),
            content: article.content.clone(),
            updated_at: now,
            created_at: now,
        };
        state.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut state = self.enter(Call::Delete(id)).await?;
        let removed = u64::from(state.rows.remove(&id).is_some());
        expect_single_row(state.forced_affected_rows.unwrap_or(removed))
    }

    async fn update(&self, article: &Article) -> Result<Article, DbError> {
        let mut state = self.enter(Call::Update(article.id)).await?;

        let updated = state.rows.get_mut(&article.id).map(|row| {
            row.title = article.title.clone();
            row.content = article.content.clone();
            row.updated_at = article.updated_at;
            row.clone()
        });
        expect_single_row(state.forced_affected_rows.unwrap_or(u64::from(updated.is_some())))?;
        updated.ok_or(DbError::AffectedRows { expected: 1, actual: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, title: &str) -> Article {
        Article { id, ..Article::new(title, "body") }
    }

    async fn seeded(ids: &[i64]) -> MemoryArticleRepository {
        let repo = MemoryArticleRepository::new();
        repo.seed(ids.iter().map(|&id| article(id, &format!("title-{id}"))))
            .await;
        repo
    }

    fn ids(page: &ArticlePage) -> Vec<i64> {
        page.items.iter().map(|a| a.id).collect()
    }

    #[tokio::test]
    async fn fetch_without_cursor_returns_newest_first() {
        let repo = seeded(&[1, 2, 3, 4, 5]).await;

        let page = repo.fetch("", 3).await.unwrap();
        assert_eq!(ids(&page), vec![5, 4, 3]);
        assert_eq!(page.next_cursor, "3");
    }

    #[tokio::test]
    async fn fetch_with_cursor_only_returns_older_ids() {
        let repo = seeded(&[1, 2, 3, 4, 5]).await;

        let page = repo.fetch("3", 10).await.unwrap();
        assert_eq!(ids(&page), vec![2, 1]);
        assert_eq!(page.next_cursor, "1");
    }

    #[tokio::test]
    async fn exhausted_pagination_keeps_the_cursor() {
        let repo = seeded(&[1, 2]).await;

        let page = repo.fetch("1", 10).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, "1");
    }

    #[tokio::test]
    async fn fetch_with_garbage_cursor_is_bad_input() {
        let repo = seeded(&[1]).await;
        assert!(matches!(repo.fetch("abc", 10).await, Err(DbError::BadInput(_))));
    }

    #[tokio::test]
    async fn store_assigns_increasing_ids_after_seed() {
        let repo = seeded(&[7]).await;

        let stored = repo.store(&Article::new("Hello", "Content")).await.unwrap();
        assert_eq!(stored.id, 8);
        assert_eq!(stored.title, "Hello");
        assert_eq!(stored.content, "Content");
        assert_eq!(repo.get_by_title("Hello").await.unwrap().id, 8);
    }

    #[tokio::test]
    async fn delete_and_update_check_affected_rows() {
        let repo = seeded(&[1]).await;

        assert!(matches!(
            repo.delete(42).await,
            Err(DbError::AffectedRows { expected: 1, actual: 0 })
        ));
        assert!(matches!(
            repo.update(&article(42, "nope")).await,
            Err(DbError::AffectedRows { actual: 0, .. })
        ));

        repo.delete(1).await.unwrap();
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_returns_stored_row_with_original_created_at() {
        let repo = seeded(&[1]).await;
        let original = repo.get_by_id(1).await.unwrap();

        let changes = Article { id: 1, ..Article::new("renamed", "v2") };
        let updated = repo.update(&changes).await.unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, "v2");
        assert_eq!(updated.updated_at, changes.updated_at);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(repo.get_by_id(1).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn forced_affected_rows_overrides_the_real_count() {
        let repo = seeded(&[1]).await;
        repo.force_affected_rows(2).await;

        assert!(matches!(
            repo.delete(1).await,
            Err(DbError::AffectedRows { actual: 2, .. })
        ));
    }

    #[tokio::test]
    async fn injected_failure_is_reported_and_call_still_recorded() {
        let repo = seeded(&[1]).await;
        repo.fail_on(Operation::GetById, "connection reset").await;

        assert!(matches!(repo.get_by_id(1).await, Err(DbError::Backend(_))));
        assert_eq!(repo.calls().await, vec![Call::GetById(1)]);
        assert_eq!(repo.call_count(Operation::GetById).await, 1);
    }
}
