//! Clipboard event envelope.
//!
//! A [`ClipboardEvent`] is created once per detected clipboard change. It
//! carries the raw content, its classification, a creation timestamp and a
//! short single-line preview for display.
//!
//! Producers: monitor (change gate)
//! Consumers: dispatch observers, CLI, HTTP layer

use clipboardai_detect::{ClassificationResult, ContentType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default preview length in characters.
pub const PREVIEW_LEN: usize = 100;

/// Marker substituted for line breaks in previews.
const LINE_BREAK_MARKER: &str = " ↵ ";

/// A clipboard change together with its detected context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEvent {
    /// Unique identifier (UUID).
    pub id: String,
    /// Raw clipboard content, untrimmed.
    pub content: String,
    /// Classification of `content`.
    #[serde(flatten)]
    pub classification: ClassificationResult,
    /// Timestamp in milliseconds since epoch.
    pub timestamp_ms: i64,
    /// Single-line preview, at most [`PREVIEW_LEN`] characters plus ellipsis.
    pub preview: String,
}

impl ClipboardEvent {
    pub fn new(content: impl Into<String>, classification: ClassificationResult) -> Self {
        let content = content.into();
        let preview = preview_of(&content, PREVIEW_LEN);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content,
            classification,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            preview,
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.classification.content_type
    }

    pub fn confidence(&self) -> f64 {
        self.classification.confidence
    }

    pub fn suggested_actions(&self) -> &[String] {
        &self.classification.suggested_actions
    }

    pub fn metadata(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.classification.metadata
    }

    /// Preview with a custom length, computed from the raw content.
    pub fn preview_with_len(&self, max_len: usize) -> String {
        preview_of(&self.content, max_len)
    }
}

impl fmt::Display for ClipboardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClipboardEvent(type={}, confidence={:.2}, actions={})",
            self.content_type(),
            self.confidence(),
            self.suggested_actions().len()
        )
    }
}

/// Truncate `content` to `max_len` characters (appending `...` when cut)
/// and flatten it onto one line.
pub fn preview_of(content: &str, max_len: usize) -> String {
    let mut preview: String = content.chars().take(max_len).collect();
    if content.chars().nth(max_len).is_some() {
        preview.push_str("...");
    }
    preview
        .replace("\r\n", LINE_BREAK_MARKER)
        .replace('\n', LINE_BREAK_MARKER)
        .replace('\r', "")
        .replace('\t', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipboardai_detect::ContextDetector;

    fn event(content: &str) -> ClipboardEvent {
        let detector = ContextDetector::new().unwrap();
        ClipboardEvent::new(content, detector.detect(content))
    }

    #[test]
    fn test_preview_short_content_unchanged() {
        assert_eq!(preview_of("hello", 100), "hello");
    }

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        let content = "a".repeat(150);
        let preview = preview_of(&content, 100);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_exact_length_has_no_ellipsis() {
        let content = "b".repeat(100);
        assert_eq!(preview_of(&content, 100), content);
    }

    #[test]
    fn test_preview_flattens_line_breaks() {
        assert_eq!(preview_of("a\r\nb\nc\td", 100), "a ↵ b ↵ c d");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let content = "é".repeat(10);
        assert_eq!(preview_of(&content, 3), "ééé...");
    }

    #[test]
    fn test_event_carries_classification() {
        let event = event("https://example.com");
        assert_eq!(event.content_type(), ContentType::Url);
        assert_eq!(event.preview, "https://example.com");
        assert!(event.timestamp_ms > 0);
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_event_keeps_raw_content() {
        let event = event("  padded text \n");
        assert_eq!(event.content, "  padded text \n");
        assert_eq!(event.content_type(), ContentType::PlainText);
    }

    #[test]
    fn test_event_serializes_flat() {
        let event = event("def f():\n    pass");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "python_code");
        assert_eq!(value["metadata"]["language"], "python");
        assert_eq!(value["preview"], "def f(): ↵     pass");

        let back: ClipboardEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_display() {
        let event = event("user@example.com");
        assert_eq!(
            event.to_string(),
            "ClipboardEvent(type=email, confidence=0.90, actions=1)"
        );
    }
}
