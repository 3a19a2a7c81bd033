//! Start-up configuration assembled from flags and environment.

use crate::cli::GlobalArgs;
use anyhow::{anyhow, Result};
use clipboardai_llm::{AiConfig, ProviderKind};
use std::path::PathBuf;
use std::time::Duration;

const DB_FILE_NAME: &str = "clipboardai.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub db_path: PathBuf,
}

impl AppConfig {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        Self::from_args_with(args, |key| std::env::var(key).ok())
    }

    /// `env` supplies the provider's API key variable when `--api-key` is absent.
    pub fn from_args_with<F>(args: &GlobalArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = ProviderKind::parse(&args.provider)
            .ok_or_else(|| anyhow!("unknown AI provider '{}', expected openai or groq", args.provider))?;

        let mut ai = AiConfig::new(provider).with_model(&args.model);
        ai.temperature = args.temperature;
        ai.max_tokens = args.max_tokens;
        ai.timeout = Duration::from_secs(args.timeout_secs);
        ai.api_key = args
            .api_key
            .clone()
            .or_else(|| env(provider.api_key_env_var()))
            .filter(|k| !k.trim().is_empty());

        let db_path = match &args.db {
            Some(path) => path.clone(),
            None => default_db_path()?,
        };

        Ok(Self { ai, db_path })
    }
}

/// `<data_local_dir>/clipboardai/clipboardai.db`
pub fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir().ok_or_else(|| anyhow!("no local data directory"))?;
    Ok(base.join("clipboardai").join(DB_FILE_NAME))
}
