//! Prompt store + processor: runs a named action over clipboard content.

use crate::processor::{AiProcessor, ProcessorStats};
use clipboardai_prompts::{PromptStore, PromptVars};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Result of executing an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    pub success: bool,
    pub content: Option<String>,
    pub tokens_used: u64,
    pub model: String,
    pub error: Option<String>,
    /// Characters in the input content.
    pub input_length: usize,
    /// Characters in the generated output, 0 on failure.
    pub output_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub ai: ProcessorStats,
    pub available_actions: usize,
    pub estimated_cost: f64,
}

pub struct ActionEngine {
    prompts: Arc<RwLock<PromptStore>>,
    processor: AiProcessor,
}

impl ActionEngine {
    /// `prompts` is shared so runtime prompt edits take effect immediately.
    pub fn new(prompts: Arc<RwLock<PromptStore>>, processor: AiProcessor) -> Self {
        Self { prompts, processor }
    }

    pub fn processor(&self) -> &AiProcessor {
        &self.processor
    }

    pub fn prompts(&self) -> &Arc<RwLock<PromptStore>> {
        &self.prompts
    }

    /// Execute `action` on `content`. Never fails; unknown actions and
    /// missing template variables come back as unsuccessful outcomes.
    pub async fn execute_action(
        &self,
        action: &str,
        content: &str,
        vars: &PromptVars,
    ) -> ActionOutcome {
        let input_length = content.chars().count();
        let prompt = {
            let store = self.prompts.read().expect("prompt store lock poisoned");
            store.full_prompt(action, content, vars)
        };

        let prompt = match prompt {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(action, error = %e, "cannot build prompt");
                return ActionOutcome {
                    action: action.to_string(),
                    success: false,
                    content: None,
                    tokens_used: 0,
                    model: self.processor.model().to_string(),
                    error: Some(e.to_string()),
                    input_length,
                    output_length: 0,
                };
            }
        };

        tracing::debug!(action, input_length, "executing action");
        let outcome = self.processor.process(&prompt.system, &prompt.user, false).await;
        let output_length = outcome
            .content
            .as_deref()
            .map(|c| c.chars().count())
            .unwrap_or(0);

        ActionOutcome {
            action: action.to_string(),
            success: outcome.success,
            content: outcome.content,
            tokens_used: outcome.tokens_used,
            model: outcome.model,
            error: outcome.error,
            input_length,
            output_length,
        }
    }

    pub fn stats(&self) -> EngineStats {
        let available_actions = self
            .prompts
            .read()
            .expect("prompt store lock poisoned")
            .list_actions()
            .len();
        EngineStats {
            ai: self.processor.stats(),
            available_actions,
            estimated_cost: self.processor.estimate_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::processor::tests::{ok, ScriptedProvider};
    use crate::retry::RetryPolicy;
    use std::time::Duration;

    fn engine(provider: &Arc<ScriptedProvider>) -> ActionEngine {
        let processor = AiProcessor::with_policy(
            provider.clone(),
            ProviderKind::OpenAi,
            RetryPolicy::new(2, Duration::from_millis(1)),
        );
        ActionEngine::new(Arc::new(RwLock::new(PromptStore::new())), processor)
    }

    #[tokio::test]
    async fn test_execute_action_sends_rendered_prompts() {
        let provider = Arc::new(ScriptedProvider::new(vec![ok("def calculate(): pass", 150)]));
        let engine = engine(&provider);

        let outcome = engine
            .execute_action("fix_typos", "def calcluate(): pass", &PromptVars::new())
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.action, "fix_typos");
        assert_eq!(outcome.tokens_used, 150);
        assert_eq!(outcome.input_length, 21);
        assert_eq!(outcome.output_length, 21);

        let calls = provider.calls.lock().unwrap();
        assert!(calls[0].0.starts_with("You are a strict code typo fixer."));
        assert_eq!(calls[0].1, "Fix typos in this code:\n\ndef calcluate(): pass");
    }

    #[tokio::test]
    async fn test_unknown_action_is_a_failed_outcome() {
        let provider = Arc::new(ScriptedProvider::new(vec![ok("never", 1)]));
        let engine = engine(&provider);

        let outcome = engine
            .execute_action("make_coffee", "beans", &PromptVars::new())
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("make_coffee"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_variable_is_a_failed_outcome() {
        let provider = Arc::new(ScriptedProvider::new(vec![ok("never", 1)]));
        let engine = engine(&provider);

        let outcome = engine
            .execute_action("translate", "Hola", &PromptVars::new())
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("target_language"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_edits_are_visible() {
        let provider = Arc::new(ScriptedProvider::new(vec![ok("ok", 1)]));
        let engine = engine(&provider);
        engine
            .prompts()
            .write()
            .unwrap()
            .set_system_prompt("fix_grammar", "Be terse.")
            .unwrap();

        engine
            .execute_action("fix_grammar", "teh", &PromptVars::new())
            .await;
        assert_eq!(provider.calls.lock().unwrap()[0].0, "Be terse.");
    }

    #[tokio::test]
    async fn test_stats() {
        let provider = Arc::new(ScriptedProvider::new(vec![ok("ok", 10)]));
        let engine = engine(&provider);
        engine
            .execute_action("summarize_page", "https://example.com", &PromptVars::new())
            .await;

        let stats = engine.stats();
        assert_eq!(stats.available_actions, 24);
        assert_eq!(stats.ai.total_requests, 1);
        assert_eq!(stats.ai.total_tokens, 10);
    }
}
