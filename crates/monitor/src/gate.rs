//! Change-detection gate between the clipboard source and the dispatcher.

/// Decides whether a clipboard read is a new, publishable change.
///
/// A read passes when it is present, differs from the last published
/// content and is not blank. Only passing reads update the remembered
/// content, so `A, "", A` yields a single publish.
#[derive(Debug, Default, Clone)]
pub struct ChangeGate {
    last_seen: Option<String>,
}

impl ChangeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the clipboard content present when monitoring starts,
    /// without publishing it.
    pub fn prime(&mut self, initial: Option<String>) {
        self.last_seen = initial;
    }

    /// Returns the content to publish, if `read` is a new change.
    pub fn check(&mut self, read: Option<String>) -> Option<String> {
        let current = read?;
        if self.last_seen.as_deref() == Some(current.as_str()) {
            return None;
        }
        if current.trim().is_empty() {
            return None;
        }
        self.last_seen = Some(current.clone());
        Some(current)
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}
