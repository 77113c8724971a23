//! Article usecase.
//!
//! `ArticleUsecase` is what a front end talks to:
//! 1. Derives a deadline-bounded child [`Context`] from the caller's scope.
//! 2. Runs one or two repository calls inside that scope.
//! 3. Enforces title uniqueness before `store` and existence before `delete`.
//!
//! Both checks are check-then-act and not atomic: two concurrent stores with
//! the same title can both pass the check.  Callers that need strict
//! uniqueness must back it with a unique index in the store.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use db::{Article, ArticlePage, ArticleRepository};

use crate::{ArticleError, Context};

/// Per-operation time budget used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Stateless orchestrator over an injected [`ArticleRepository`].
///
/// Cheap to clone and safe to share between concurrent requests.
#[derive(Clone)]
pub struct ArticleUsecase {
    repo: Arc<dyn ArticleRepository>,
    timeout: Duration,
}

impl ArticleUsecase {
    pub fn new(repo: Arc<dyn ArticleRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    /// One page of articles, newest first.  See [`ArticleRepository::fetch`].
    #[instrument(skip(self, ctx))]
    pub async fn fetch(
        &self,
        ctx: &Context,
        cursor: &str,
        num: u32,
    ) -> Result<ArticlePage, ArticleError> {
        let scope = ctx.child(self.timeout);
        scope.run(self.repo.fetch(cursor, num)).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_by_id(&self, ctx: &Context, id: i64) -> Result<Article, ArticleError> {
        let scope = ctx.child(self.timeout);
        scope.run(self.repo.get_by_id(id)).await
    }

    /// Store a new article and return it with its generated id.
    ///
    /// # Errors
    /// [`ArticleError::BadInput`] for a blank title and
    /// [`ArticleError::Conflict`] if a live article already has this title;
    /// the insert is not attempted in either case.
    #[instrument(skip(self, ctx, article), fields(title = %article.title))]
    pub async fn store(&self, ctx: &Context, article: Article) -> Result<Article, ArticleError> {
        require_title(&article)?;
        let scope = ctx.child(self.timeout);

        match scope.run(self.repo.get_by_title(&article.title)).await {
            Ok(existing) => {
                debug!(existing_id = existing.id, "title already used");
                return Err(ArticleError::Conflict);
            }
            Err(ArticleError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let stored = scope.run(self.repo.store(&article)).await?;
        info!(id = stored.id, "article stored");
        Ok(stored)
    }

    /// Overwrite title and content of the article keyed by `article.id`,
    /// refreshing `updated_at`, and return the row as the repository wrote it.
    ///
    /// There is no existence pre-check: a missing id surfaces as the
    /// repository's affected-row error.  A blank title is
    /// [`ArticleError::BadInput`] and never reaches the repository.
    #[instrument(skip(self, ctx, article), fields(id = article.id))]
    pub async fn update(
        &self,
        ctx: &Context,
        mut article: Article,
    ) -> Result<Article, ArticleError> {
        require_title(&article)?;
        let scope = ctx.child(self.timeout);

        article.updated_at = Utc::now();
        let stored = scope.run(self.repo.update(&article)).await?;
        info!("article updated");
        Ok(stored)
    }

    /// Delete an article after confirming it exists.
    ///
    /// # Errors
    /// [`ArticleError::NotFound`] if the lookup finds nothing; the delete is
    /// not attempted in that case.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &Context, id: i64) -> Result<(), ArticleError> {
        let scope = ctx.child(self.timeout);

        if let Err(e) = scope.run(self.repo.get_by_id(id)).await {
            if matches!(e, ArticleError::NotFound) {
                debug!("nothing to delete");
            } else {
                warn!("existence check failed: {e}");
            }
            return Err(e);
        }

        scope.run(self.repo.delete(id)).await?;
        info!("article deleted");
        Ok(())
    }
}

fn require_title(article: &Article) -> Result<(), ArticleError> {
    if article.title.trim().is_empty() {
        return Err(ArticleError::BadInput("title is required".into()));
    }
    Ok(())
}
