//! AI completion layer.
//!
//! - [`CompletionProvider`]: the external chat completion call, implemented
//!   for OpenAI-compatible endpoints by [`OpenAiCompatible`]
//! - [`AiProcessor`]: retries, usage stats and an optional response cache
//! - [`ActionEngine`]: renders an action's prompts and runs them

mod config;
mod engine;
mod error;
mod processor;
mod provider;
mod retry;

pub use config::{
    AiConfig, ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT,
};
pub use engine::{ActionEngine, ActionOutcome, EngineStats};
pub use error::{ProviderError, Result};
pub use processor::{AiProcessor, CompletionOutcome, ProcessorStats};
pub use provider::{classify_status, parse_completion, Completion, CompletionProvider, OpenAiCompatible};
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
