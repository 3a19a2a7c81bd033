//! The prompt store: one system prompt and one user template per action.

use crate::action::Action;
use crate::template::{placeholders, render};
use crate::{defaults, PromptError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Variables available to templates besides `content`.
pub type PromptVars = HashMap<String, String>;

/// A rendered prompt pair, ready to send to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullPrompt {
    pub system: String,
    pub user: String,
}

/// On-disk representation used by export/import.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PromptFile {
    #[serde(default)]
    system_prompts: BTreeMap<String, String>,
    #[serde(default)]
    user_templates: BTreeMap<String, String>,
}

/// Lookup table from action to prompt templates.
///
/// Built once with the defaults, optionally customised, then shared.
#[derive(Debug, Clone)]
pub struct PromptStore {
    system_prompts: BTreeMap<Action, String>,
    user_templates: BTreeMap<Action, String>,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptStore {
    pub fn new() -> Self {
        Self {
            system_prompts: Action::ALL
                .iter()
                .map(|a| (*a, defaults::system_prompt(*a).to_string()))
                .collect(),
            user_templates: Action::ALL
                .iter()
                .map(|a| (*a, defaults::user_template(*a).to_string()))
                .collect(),
        }
    }

    /// Defaults with custom system prompts applied. Unknown action names are
    /// skipped.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut store = Self::new();
        for (name, prompt) in overrides {
            if let Err(e) = store.set_system_prompt(name.as_ref(), prompt) {
                tracing::warn!(error = %e, "ignoring prompt override");
            }
        }
        store
    }

    /// Raw system prompt for `action`, placeholders unrendered.
    pub fn system_prompt(&self, action: &str) -> Result<String> {
        let action = lookup(action)?;
        Ok(self.system_prompts[&action].trim().to_string())
    }

    /// Render the user template for `action` with `content` and `vars`.
    pub fn user_prompt(&self, action: &str, content: &str, vars: &PromptVars) -> Result<String> {
        let parsed = lookup(action)?;
        let vars = with_content(content, vars);
        render(action, &self.user_templates[&parsed], &vars)
    }

    /// Both prompts rendered with the same variables.
    ///
    /// Placeholders in the system prompt that have no value are left as
    /// written, so a customised prompt may contain literal `{word}` text.
    pub fn full_prompt(&self, action: &str, content: &str, vars: &PromptVars) -> Result<FullPrompt> {
        let parsed = lookup(action)?;
        let all_vars = with_content(content, vars);

        // Unset system placeholders render as themselves.
        let mut system_vars = all_vars.clone();
        let system_template = self.system_prompts[&parsed].trim();
        for name in placeholders(system_template) {
            if !system_vars.contains_key(&name) {
                let literal = format!("{{{name}}}");
                system_vars.insert(name, literal);
            }
        }
        let system = render(action, system_template, &system_vars)?;

        let user = render(action, &self.user_templates[&parsed], &all_vars)?;
        Ok(FullPrompt { system, user })
    }

    /// All actions with prompts, in catalogue order.
    pub fn list_actions(&self) -> Vec<Action> {
        self.system_prompts.keys().copied().collect()
    }

    pub fn contains(&self, action: &str) -> bool {
        Action::from_name(action).is_some()
    }

    /// Variables (besides `content`) the user template for `action` needs.
    pub fn required_variables(&self, action: &str) -> Result<Vec<String>> {
        let parsed = lookup(action)?;
        Ok(placeholders(&self.user_templates[&parsed])
            .into_iter()
            .filter(|name| name != "content")
            .collect())
    }

    /// Replace the system prompt for `action`.
    pub fn set_system_prompt(&mut self, action: &str, prompt: impl Into<String>) -> Result<()> {
        let parsed = lookup(action)?;
        self.system_prompts.insert(parsed, prompt.into());
        tracing::debug!(action, "system prompt updated");
        Ok(())
    }

    /// Replace the user template for `action`.
    pub fn set_user_template(&mut self, action: &str, template: impl Into<String>) -> Result<()> {
        let parsed = lookup(action)?;
        self.user_templates.insert(parsed, template.into());
        Ok(())
    }

    /// Whether the system prompt for `action` differs from the default.
    pub fn is_customized(&self, action: &str) -> Result<bool> {
        let parsed = lookup(action)?;
        Ok(self.system_prompts[&parsed] != defaults::system_prompt(parsed))
    }

    /// Restore the default prompts for `action`.
    pub fn reset(&mut self, action: &str) -> Result<()> {
        let parsed = lookup(action)?;
        self.system_prompts
            .insert(parsed, defaults::system_prompt(parsed).to_string());
        self.user_templates
            .insert(parsed, defaults::user_template(parsed).to_string());
        Ok(())
    }

    /// Write every prompt and template to `path` as pretty JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let file = PromptFile {
            system_prompts: self
                .system_prompts
                .iter()
                .map(|(a, p)| (a.name().to_string(), p.clone()))
                .collect(),
            user_templates: self
                .user_templates
                .iter()
                .map(|(a, t)| (a.name().to_string(), t.clone()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "prompts exported");
        Ok(())
    }

    /// Merge prompts from a file written by [`export_json`](Self::export_json).
    /// Returns the number of entries applied; unknown actions are skipped.
    pub fn import_json(&mut self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: PromptFile = serde_json::from_str(&raw)?;

        let mut applied = 0;
        for (name, prompt) in file.system_prompts {
            match self.set_system_prompt(&name, prompt) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(error = %e, "skipping imported system prompt"),
            }
        }
        for (name, template) in file.user_templates {
            match self.set_user_template(&name, template) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(error = %e, "skipping imported user template"),
            }
        }
        tracing::info!(path = %path.display(), applied, "prompts imported");
        Ok(applied)
    }
}

fn lookup(action: &str) -> Result<Action> {
    Action::from_name(action).ok_or_else(|| PromptError::NotFound(action.to_string()))
}

fn with_content(content: &str, vars: &PromptVars) -> PromptVars {
    let mut all = vars.clone();
    all.insert("content".to_string(), content.to_string());
    all
}
