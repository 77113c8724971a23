use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use db::Article;
use usecase::Context;

use crate::extract::{JsonBody, Path, Query};
use crate::{ApiError, AppState};

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const CURSOR_HEADER: &str = "x-cursor";

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub num: Option<u32>,
    #[serde(default)]
    pub cursor: String,
}

#[derive(Debug, Deserialize)]
pub struct ArticleDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl ArticleDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".into()));
        }
        Ok(())
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<([(&'static str, String); 1], Json<Vec<Article>>), ApiError> {
    let num = match params.num {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(n) => n,
    };

    let page = state
        .articles
        .fetch(&Context::background(), &params.cursor, num)
        .await?;

    Ok(([(CURSOR_HEADER, page.next_cursor)], Json(page.items)))
}

pub async fn get(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Article>, ApiError> {
    let article = state.articles.get_by_id(&Context::background(), id).await?;
    Ok(Json(article))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ArticleDto>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    payload.validate()?;

    let article = Article::new(payload.title, payload.content);
    let stored = state.articles.store(&Context::background(), article).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ArticleDto>,
) -> Result<Json<Article>, ApiError> {
    payload.validate()?;

    let article = Article {
        id,
        ..Article::new(payload.title, payload.content)
    };
    let stored = state.articles.update(&Context::background(), article).await?;
    Ok(Json(stored))
}

pub async fn delete(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.articles.delete(&Context::background(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
