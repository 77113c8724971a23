//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   GET    /articles?num=&cursor=   (next cursor in the `X-Cursor` header)
//!   POST   /articles
//!   GET    /articles/{id}
//!   PUT    /articles/{id}
//!   DELETE /articles/{id}
//!   GET    /health

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use usecase::ArticleUsecase;

pub mod error;
pub mod extract;
pub mod handlers;

pub use error::{ApiError, ServerError};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub articles: ArticleUsecase,
}

impl AppState {
    pub fn new(articles: ArticleUsecase) -> Self {
        Self { articles }
    }
}

/// Build the router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/articles",
            get(handlers::articles::list).post(handlers::articles::create),
        )
        .route(
            "/articles/:id",
            get(handlers::articles::get)
                .put(handlers::articles::update)
                .delete(handlers::articles::delete),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl+C.
pub async fn serve(bind: &str, state: AppState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, starting shutdown"),
        Err(e) => tracing::error!("failed to listen for Ctrl+C: {e}"),
    }
}
