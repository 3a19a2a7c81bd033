//! Clipboard monitoring and event dispatch.
//!
//! [`ClipboardMonitor`] polls a [`ClipboardSource`] on a background thread,
//! filters reads through a [`ChangeGate`], classifies each new change and
//! hands the resulting [`ClipboardEvent`](clipboardai_events::ClipboardEvent)
//! to a [`Dispatcher`], which records it and notifies every observer.

mod dispatch;
mod gate;
mod poller;
mod source;

pub use dispatch::{
    ChannelObserver, Dispatcher, Observer, ObserverRef, PublishReport, DEFAULT_HISTORY_CAPACITY,
};
pub use gate::ChangeGate;
pub use poller::{ClipboardMonitor, DEFAULT_POLL_INTERVAL};
pub use source::{ArboardClipboard, ClipboardSource, NullSource};

use clipboardai_detect::DetectError;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("monitor is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Detector(#[from] DetectError),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
