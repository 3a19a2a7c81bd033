//! Content type tags and the classification result value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content found on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    PythonCode,
    #[serde(rename = "javascript_code")]
    JavaScriptCode,
    GitDiff,
    Url,
    Email,
    Json,
    Markdown,
    Sql,
    PlainText,
    Unknown,
}

impl ContentType {
    /// Every content type, in cascade order (fallbacks last).
    pub const ALL: [ContentType; 10] = [
        Self::GitDiff,
        Self::Url,
        Self::PythonCode,
        Self::JavaScriptCode,
        Self::Json,
        Self::Sql,
        Self::Markdown,
        Self::Email,
        Self::PlainText,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PythonCode => "python_code",
            Self::JavaScriptCode => "javascript_code",
            Self::GitDiff => "git_diff",
            Self::Url => "url",
            Self::Email => "email",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Sql => "sql",
            Self::PlainText => "plain_text",
            Self::Unknown => "unknown",
        }
    }

    /// Actions offered for this content type, most relevant first.
    pub fn default_actions(&self) -> &'static [&'static str] {
        match self {
            Self::PythonCode => &["fix_typos", "add_docstring", "generate_tests", "explain_code"],
            Self::JavaScriptCode => &[
                "fix_typos",
                "add_jsdoc",
                "convert_to_typescript",
                "explain_code",
            ],
            Self::GitDiff => &["generate_commit", "summarize_changes"],
            Self::Url => &["fetch_content", "summarize_page", "extract_links"],
            Self::Email => &["validate_email"],
            Self::Json => &["format_json", "validate_json", "extract_values"],
            Self::Markdown => &["convert_to_html", "extract_headings", "summarize"],
            Self::Sql => &["format_sql", "explain_query", "optimize"],
            Self::PlainText => &["fix_grammar", "translate", "summarize", "extract_keywords"],
            Self::Unknown => &[],
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Self::PythonCode | Self::JavaScriptCode)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one piece of content.
///
/// `metadata` is an open map: keys depend on the content type
/// (`lines`, `url`, `language`, `word_count`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub confidence: f64,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl ClassificationResult {
    /// Build a result using the type's default action list.
    pub fn new(
        content_type: ContentType,
        confidence: f64,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            content_type,
            confidence: confidence.clamp(0.0, 1.0),
            metadata,
            suggested_actions: content_type
                .default_actions()
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }

    /// Result for empty or whitespace-only content.
    pub fn unknown() -> Self {
        Self::new(ContentType::Unknown, 0.0, serde_json::Map::new())
    }
}
