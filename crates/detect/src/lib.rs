//! Content detection for clipboard text.
//!
//! Classifies arbitrary text into a [`ContentType`] with a confidence score,
//! type-specific metadata and the list of actions worth offering for it.
//!
//! # Example
//!
//! ```
//! use clipboardai_detect::{ContentType, ContextDetector};
//!
//! let detector = ContextDetector::new().unwrap();
//! let result = detector.detect("SELECT * FROM users WHERE id = 1");
//! assert_eq!(result.content_type, ContentType::Sql);
//! ```

mod content_type;
mod detector;
pub mod patterns;

pub use content_type::{ClassificationResult, ContentType};
pub use detector::{ContextDetector, LANGUAGE_THRESHOLD, MARKDOWN_THRESHOLD, SQL_THRESHOLD};
pub use patterns::PatternLibrary;

/// Errors raised while building a detector.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("invalid built-in pattern: {0}")]
    InvalidPattern(#[source] regex::Error),
}
