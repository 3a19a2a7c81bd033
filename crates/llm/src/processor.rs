//! Retrying completion processor with usage tracking and a response cache.

use crate::config::ProviderKind;
use crate::provider::CompletionProvider;
use crate::retry::RetryPolicy;
use crate::ProviderError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Result of one processed prompt. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub success: bool,
    pub content: Option<String>,
    pub tokens_used: u64,
    pub model: String,
    pub error: Option<String>,
}

impl CompletionOutcome {
    pub fn succeeded(content: String, tokens_used: u64, model: &str) -> Self {
        Self {
            success: true,
            content: Some(content),
            tokens_used,
            model: model.to_string(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, model: &str) -> Self {
        Self {
            success: false,
            content: None,
            tokens_used: 0,
            model: model.to_string(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessorStats {
    /// Provider calls made, including failed attempts.
    pub total_requests: u64,
    pub total_tokens: u64,
    pub avg_tokens_per_request: f64,
    pub cached_responses: usize,
}

#[derive(Debug, Default)]
struct Usage {
    requests: u64,
    tokens: u64,
}

/// Sends prompts to a [`CompletionProvider`] with retries.
pub struct AiProcessor {
    provider: Arc<dyn CompletionProvider>,
    kind: ProviderKind,
    policy: RetryPolicy,
    usage: Mutex<Usage>,
    cache: Mutex<HashMap<String, CompletionOutcome>>,
}

impl AiProcessor {
    pub fn new(provider: Arc<dyn CompletionProvider>, kind: ProviderKind) -> Self {
        Self::with_policy(provider, kind, RetryPolicy::default())
    }

    pub fn with_policy(
        provider: Arc<dyn CompletionProvider>,
        kind: ProviderKind,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            kind,
            policy,
            usage: Mutex::new(Usage::default()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run one prompt pair through the provider.
    ///
    /// With `use_cache`, an identical earlier success is returned without a
    /// provider call, and a new success is remembered.
    pub async fn process(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        use_cache: bool,
    ) -> CompletionOutcome {
        let cache_key = format!("{system_prompt}::{user_prompt}");
        if use_cache {
            let cache = self.cache.lock().expect("cache mutex poisoned");
            if let Some(hit) = cache.get(&cache_key) {
                tracing::debug!("using cached response");
                return hit.clone();
            }
        }

        let model = self.provider.model().to_string();
        let mut attempt = 0;
        loop {
            self.usage.lock().expect("usage mutex poisoned").requests += 1;

            match self.provider.complete(system_prompt, user_prompt).await {
                Ok(completion) => {
                    self.usage.lock().expect("usage mutex poisoned").tokens +=
                        completion.tokens_used;
                    tracing::info!(tokens = completion.tokens_used, "AI response received");

                    let outcome = CompletionOutcome::succeeded(
                        completion.content,
                        completion.tokens_used,
                        &model,
                    );
                    if use_cache {
                        self.cache
                            .lock()
                            .expect("cache mutex poisoned")
                            .insert(cache_key, outcome.clone());
                    }
                    return outcome;
                }
                Err(e) => {
                    let delay = self.policy.delay_for(&e, attempt);
                    match delay {
                        Some(delay) if !self.policy.is_last(attempt) => {
                            tracing::warn!(
                                attempt = attempt + 1,
                                error = %e,
                                "AI request failed, retrying in {:?}",
                                delay
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        _ => return self.give_up(e, attempt + 1, &model),
                    }
                }
            }
        }
    }

    fn give_up(&self, error: ProviderError, attempts: u32, model: &str) -> CompletionOutcome {
        tracing::error!(attempts, error = %error, "AI request failed");
        CompletionOutcome::failed(error.to_string(), model)
    }

    pub fn stats(&self) -> ProcessorStats {
        let usage = self.usage.lock().expect("usage mutex poisoned");
        let cached = self.cache.lock().expect("cache mutex poisoned").len();
        ProcessorStats {
            total_requests: usage.requests,
            total_tokens: usage.tokens,
            avg_tokens_per_request: if usage.requests > 0 {
                usage.tokens as f64 / usage.requests as f64
            } else {
                0.0
            },
            cached_responses: cached,
        }
    }

    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache mutex poisoned").clear();
    }

    /// Rough spend in USD for the tokens used so far.
    pub fn estimate_cost(&self) -> f64 {
        let tokens = self.usage.lock().expect("usage mutex poisoned").tokens;
        tokens as f64 / 1_000_000.0 * self.kind.cost_per_million_tokens()
    }
}
