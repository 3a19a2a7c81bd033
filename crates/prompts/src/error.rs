//! Error types for prompt lookup and rendering.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The action name is not in the catalogue.
    #[error("No prompt found for action: {0}")]
    NotFound(String),

    /// A template placeholder had no value.
    #[error("Missing variable '{variable}' for action '{action}'")]
    MissingVariable { action: String, variable: String },

    #[error("Failed to access prompt file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid prompt file: {0}")]
    Json(#[from] serde_json::Error),
}
