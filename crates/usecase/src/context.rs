//! Execution scope handed to every usecase operation.
//!
//! A `Context` carries the caller's deadline (if any).  Operations derive a
//! child scope bounded by their own timeout and run each repository call
//! through [`Context::run`], which drops the call when the deadline passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use db::DbError;

use crate::ArticleError;

#[derive(Debug, Clone, Copy)]
pub struct Context {
    deadline: Option<Instant>,
    created: Instant,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// A scope with no deadline.
    pub fn background() -> Self {
        Self { deadline: None, created: Instant::now() }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline: Some(deadline), created: Instant::now() }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Derive a scope that ends `timeout` from now, or at the parent's
    /// deadline if that comes first.
    pub fn child(&self, timeout: Duration) -> Self {
        let own = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) => parent.min(own),
            None => own,
        };
        Self::with_deadline(deadline)
    }

    /// Await `call` within this scope.
    ///
    /// An expired scope fails with [`ArticleError::Timeout`] without polling
    /// `call` at all; otherwise `call` is dropped as soon as the deadline
    /// passes.
    pub async fn run<T, F>(&self, call: F) -> Result<T, ArticleError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        let Some(deadline) = self.deadline else {
            return call.await.map_err(ArticleError::from);
        };

        if Instant::now() >= deadline {
            return Err(ArticleError::Timeout(self.created.elapsed()));
        }

        match tokio::time::timeout_at(deadline, call).await {
            Ok(result) => result.map_err(ArticleError::from),
            Err(_) => Err(ArticleError::Timeout(self.created.elapsed())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn child_never_outlives_its_parent() {
        let parent = Context::with_timeout(Duration::from_secs(1));
        let child = parent.child(Duration::from_secs(5));
        assert_eq!(child.deadline(), parent.deadline());

        let tighter = parent.child(Duration::from_millis(10));
        assert!(tighter.deadline().unwrap() < parent.deadline().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn background_child_gets_its_own_deadline() {
        let child = Context::background().child(Duration::from_secs(2));
        assert_eq!(child.deadline(), Some(Instant::now() + Duration::from_secs(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_scope_does_not_poll_the_call() {
        let ctx = Context::with_deadline(Instant::now());
        assert!(ctx.is_expired());

        let mut polled = false;
        let result: Result<(), _> = ctx
            .run(async {
                polled = true;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ArticleError::Timeout(_))));
        assert!(!polled);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_is_cut_off_at_the_deadline() {
        let ctx = Context::with_timeout(Duration::from_millis(50));
        let result: Result<(), _> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ArticleError::Timeout(_))));
    }

    #[tokio::test]
    async fn db_errors_pass_through_classified() {
        let result: Result<(), _> = Context::background()
            .run(async { Err(DbError::NotFound) })
            .await;
        assert!(matches!(result, Err(ArticleError::NotFound)));
    }
}
