//! `article-service` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve` — start the article API server.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::{ArticleRepository, MemoryArticleRepository, PgArticleRepository};
use usecase::ArticleUsecase;

use crate::config::{Backend, ServeArgs, Settings};

#[derive(Parser)]
#[command(
    name = "article-service",
    about = "CRUD service for articles with cursor pagination",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let settings = Settings::resolve(args)?;
            init_tracing(settings.debug)?;
            serve(settings).await
        }
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

async fn serve(settings: Settings) -> Result<()> {
    let repo: Arc<dyn ArticleRepository> = match &settings.backend {
        Backend::Postgres { url, max_connections } => {
            let pool = db::pool::create_pool(url, *max_connections)
                .await
                .context("failed to connect to database")?;
            db::pool::ping(&pool)
                .await
                .context("database did not answer ping")?;
            Arc::new(PgArticleRepository::new(pool))
        }
        Backend::Memory => {
            info!("Using in-memory article store; data is lost on exit");
            Arc::new(MemoryArticleRepository::new())
        }
    };

    let articles = ArticleUsecase::new(repo, settings.timeout);
    info!(
        "Starting API server on {} (timeout={:?})",
        settings.bind, settings.timeout
    );
    api::serve(&settings.bind, api::AppState::new(articles))
        .await
        .context("server failed")?;
    Ok(())
}
