//! The detection cascade.

use crate::content_type::{ClassificationResult, ContentType};
use crate::patterns::PatternLibrary;
use crate::DetectError;
use serde_json::{json, Map, Value};

/// Minimum number of matched indicators for a language to win.
pub const LANGUAGE_THRESHOLD: usize = 2;

/// Minimum number of distinct SQL keywords.
pub const SQL_THRESHOLD: usize = 2;

/// Minimum number of Markdown markers.
pub const MARKDOWN_THRESHOLD: usize = 2;

const GIT_DIFF_CONFIDENCE: f64 = 0.95;
const URL_CONFIDENCE: f64 = 0.9;
const JSON_CONFIDENCE: f64 = 0.85;
const SQL_CONFIDENCE: f64 = 0.8;
const MARKDOWN_CONFIDENCE: f64 = 0.7;
const EMAIL_CONFIDENCE: f64 = 0.9;
const PLAIN_TEXT_CONFIDENCE: f64 = 0.6;
const MAX_LANGUAGE_CONFIDENCE: f64 = 0.95;

/// Classifies clipboard text into a [`ContentType`].
///
/// Checks run in a fixed order and the first one that matches decides the
/// result:
///
/// 1. empty after trimming -> `Unknown`
/// 2. git diff markers
/// 3. single-line URL
/// 4. Python, then JavaScript indicators (preempts everything below)
/// 5. JSON
/// 6. SQL keywords
/// 7. Markdown markers
/// 8. single-line email address
/// 9. plain text
#[derive(Debug, Clone)]
pub struct ContextDetector {
    patterns: PatternLibrary,
}

impl ContextDetector {
    pub fn new() -> Result<Self, DetectError> {
        let patterns = PatternLibrary::new().map_err(DetectError::InvalidPattern)?;
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    /// Classify `content`. Never fails.
    pub fn detect(&self, content: &str) -> ClassificationResult {
        let content = content.trim();
        if content.is_empty() {
            return ClassificationResult::unknown();
        }

        if self.patterns.is_git_diff(content) {
            return ClassificationResult::new(
                ContentType::GitDiff,
                GIT_DIFF_CONFIDENCE,
                metadata([("lines", json!(newline_count(content)))]),
            );
        }

        if self.patterns.is_url(content) {
            return ClassificationResult::new(
                ContentType::Url,
                URL_CONFIDENCE,
                metadata([("url", json!(content))]),
            );
        }

        if let Some(result) = self.detect_language(content) {
            return result;
        }

        if self.patterns.is_json(content) {
            return ClassificationResult::new(ContentType::Json, JSON_CONFIDENCE, Map::new());
        }

        if self.patterns.sql_keyword_count(content) >= SQL_THRESHOLD {
            return ClassificationResult::new(ContentType::Sql, SQL_CONFIDENCE, Map::new());
        }

        if self.patterns.markdown_score(content) >= MARKDOWN_THRESHOLD {
            return ClassificationResult::new(
                ContentType::Markdown,
                MARKDOWN_CONFIDENCE,
                Map::new(),
            );
        }

        if self.patterns.is_email(content) {
            return ClassificationResult::new(ContentType::Email, EMAIL_CONFIDENCE, Map::new());
        }

        ClassificationResult::new(
            ContentType::PlainText,
            PLAIN_TEXT_CONFIDENCE,
            metadata([("word_count", json!(content.split_whitespace().count()))]),
        )
    }

    /// Action names offered for a content type.
    pub fn action_names(&self, content_type: ContentType) -> Vec<String> {
        content_type
            .default_actions()
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    /// Python is scored first; JavaScript is only considered when Python
    /// stays below the threshold.
    fn detect_language(&self, content: &str) -> Option<ClassificationResult> {
        let python = self.patterns.python_score(content);
        if python >= LANGUAGE_THRESHOLD {
            return Some(language_result(ContentType::PythonCode, "python", python, content));
        }

        let javascript = self.patterns.javascript_score(content);
        if javascript >= LANGUAGE_THRESHOLD {
            return Some(language_result(
                ContentType::JavaScriptCode,
                "javascript",
                javascript,
                content,
            ));
        }

        None
    }
}

fn language_result(
    content_type: ContentType,
    language: &str,
    score: usize,
    content: &str,
) -> ClassificationResult {
    ClassificationResult::new(
        content_type,
        language_confidence(score),
        metadata([
            ("language", json!(language)),
            ("lines", json!(newline_count(content) + 1)),
        ]),
    )
}

/// `0.6 + 0.1 * score`, capped at 0.95. Computed in tenths to keep the
/// values exact (score 2 gives exactly 0.8).
fn language_confidence(score: usize) -> f64 {
    ((6 + score) as f64 / 10.0).min(MAX_LANGUAGE_CONFIDENCE)
}

fn newline_count(content: &str) -> usize {
    content.matches('\n').count()
}

fn metadata<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
