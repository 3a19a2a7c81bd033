//! Action catalogue and prompt templates.
//!
//! Every action the assistant can apply to clipboard content has a system
//! prompt (the assistant persona) and a user template with `{name}`
//! placeholders. `{content}` is always supplied; some actions need more,
//! e.g. `translate` needs `{target_language}`.
//!
//! # Example
//!
//! ```
//! use clipboardai_prompts::{PromptStore, PromptVars};
//!
//! let store = PromptStore::new();
//! let prompt = store.full_prompt("fix_typos", "pritn(1)", &PromptVars::new()).unwrap();
//! assert!(prompt.user.ends_with("pritn(1)"));
//! ```

mod action;
mod defaults;
mod error;
mod store;
mod template;

pub use action::{Action, Category};
pub use error::{PromptError, Result};
pub use store::{FullPrompt, PromptStore, PromptVars};
pub use template::{placeholders, render};
