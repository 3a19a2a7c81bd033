//! ClipboardAI application: CLI commands, clipboard watcher and HTTP API.

pub mod cli;
pub mod config;
pub mod server;
pub mod watch;

use clipboardai_llm::{ActionEngine, AiConfig, AiProcessor, OpenAiCompatible};
use clipboardai_prompts::PromptStore;
use std::sync::{Arc, RwLock};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,clipboardai=debug")),
        )
        .init();
}

/// Build the action engine, or `None` when the provider cannot be set up
/// (usually a missing API key). Detection keeps working either way.
pub fn build_engine(
    config: &AiConfig,
    prompts: Arc<RwLock<PromptStore>>,
) -> Option<Arc<ActionEngine>> {
    match OpenAiCompatible::new(config.clone()) {
        Ok(provider) => {
            let processor = AiProcessor::new(Arc::new(provider), config.provider);
            Some(Arc::new(ActionEngine::new(prompts, processor)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI engine disabled");
            None
        }
    }
}
