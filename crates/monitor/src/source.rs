//! Clipboard source abstraction.
//!
//! The watch loop only depends on [`ClipboardSource`], so the gating and
//! dispatch logic can be exercised without a real system clipboard.

use crate::MonitorError;

/// Something that can be polled for the current clipboard text.
pub trait ClipboardSource: Send + Sync {
    /// Read the current clipboard text.
    ///
    /// An error means the clipboard could not be read this tick (locked,
    /// non-text content, no display server); callers treat it as "no change".
    fn read(&self) -> Result<String, MonitorError>;
}

/// System clipboard backed by `arboard`.
pub struct ArboardClipboard;

impl ArboardClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSource for ArboardClipboard {
    fn read(&self) -> Result<String, MonitorError> {
        // A fresh handle per read; some platforms drop ownership between polls.
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| MonitorError::ClipboardUnavailable(e.to_string()))?;
        clipboard
            .get_text()
            .map_err(|e| MonitorError::ClipboardUnavailable(e.to_string()))
    }
}

/// Source that is never readable. Useful for headless runs and tests.
pub struct NullSource;

impl ClipboardSource for NullSource {
    fn read(&self) -> Result<String, MonitorError> {
        Err(MonitorError::ClipboardUnavailable("no clipboard".to_string()))
    }
}
