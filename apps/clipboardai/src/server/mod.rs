//! HTTP API over detection, actions, prompts and history.

mod dto;
mod error;
mod handlers;

pub use dto::*;
pub use error::{ApiError, ApiResult};

use crate::config::AppConfig;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clipboardai_detect::ContextDetector;
use clipboardai_llm::{ActionEngine, ProviderKind};
use clipboardai_prompts::PromptStore;
use clipboardai_storage::Database;
use std::sync::{Arc, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<ContextDetector>,
    pub prompts: Arc<RwLock<PromptStore>>,
    /// `None` when no API key is configured.
    pub engine: Option<Arc<ActionEngine>>,
    pub db: Arc<Database>,
    pub provider: ProviderKind,
    pub model: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/detect", post(handlers::detect))
        .route("/api/process", post(handlers::process))
        .route("/api/actions", get(handlers::list_actions))
        .route(
            "/api/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route(
            "/api/history/{id}",
            get(handlers::get_history_item).delete(handlers::delete_history_item),
        )
        .route("/api/stats", get(handlers::stats))
        .route(
            "/api/prompts/{action}",
            get(handlers::get_prompt).put(handlers::update_prompt),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the database, load saved prompt overrides and serve until Ctrl-C.
pub async fn serve(config: AppConfig, host: &str, port: u16) -> Result<()> {
    let db = Database::open_creating_dirs(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;
    let overrides = db.load_prompt_overrides()?;
    if !overrides.is_empty() {
        tracing::info!(count = overrides.len(), "loaded prompt overrides");
    }
    let prompts = Arc::new(RwLock::new(PromptStore::with_overrides(overrides)));

    let state = AppState {
        detector: Arc::new(ContextDetector::new()?),
        engine: crate::build_engine(&config.ai, Arc::clone(&prompts)),
        prompts,
        db: Arc::new(db),
        provider: config.ai.provider,
        model: config.ai.model.clone(),
    };

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, ai_enabled = state.engine.is_some(), "HTTP API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
