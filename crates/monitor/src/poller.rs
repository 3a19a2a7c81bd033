//! Clipboard monitor - background thread that polls the clipboard.

use crate::dispatch::{Dispatcher, PublishReport};
use crate::gate::ChangeGate;
use crate::source::ClipboardSource;
use crate::MonitorError;
use clipboardai_detect::ContextDetector;
use clipboardai_events::ClipboardEvent;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default polling interval for clipboard changes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Watches a [`ClipboardSource`] and publishes every new change.
pub struct ClipboardMonitor {
    source: Arc<dyn ClipboardSource>,
    detector: Arc<ContextDetector>,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
    published: Arc<AtomicUsize>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl ClipboardMonitor {
    pub fn new(
        source: Arc<dyn ClipboardSource>,
        detector: Arc<ContextDetector>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            source,
            detector,
            dispatcher,
            running: Arc::new(AtomicBool::new(false)),
            published: Arc::new(AtomicUsize::new(0)),
            handle: None,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Start polling at [`DEFAULT_POLL_INTERVAL`].
    pub fn start(&mut self) -> Result<(), MonitorError> {
        self.start_with_interval(DEFAULT_POLL_INTERVAL)
    }

    /// Start polling with a custom interval.
    pub fn start_with_interval(&mut self, interval: Duration) -> Result<(), MonitorError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }
        self.published.store(0, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let published = Arc::clone(&self.published);
        let source = Arc::clone(&self.source);
        let detector = Arc::clone(&self.detector);
        let dispatcher = Arc::clone(&self.dispatcher);

        let handle = std::thread::spawn(move || {
            tracing::info!("ClipboardMonitor started with interval {:?}", interval);

            let mut gate = ChangeGate::new();
            gate.prime(read_or_none(source.as_ref()));

            while running.load(Ordering::SeqCst) {
                std::thread::sleep(interval);
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                if let Some(content) = gate.check(read_or_none(source.as_ref())) {
                    publish(&detector, &dispatcher, content);
                    published.fetch_add(1, Ordering::SeqCst);
                }
            }

            tracing::info!(
                published = published.load(Ordering::SeqCst),
                history = dispatcher.history_len(),
                "ClipboardMonitor stopped"
            );
        });

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the monitor and wait for the polling thread to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Events published since the last start.
    pub fn published_count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }

    /// Classify `content` and publish it directly, bypassing the gate.
    pub fn process(&self, content: &str) -> (ClipboardEvent, PublishReport) {
        publish(&self.detector, &self.dispatcher, content.to_string())
    }
}

impl Drop for ClipboardMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_or_none(source: &dyn ClipboardSource) -> Option<String> {
    match source.read() {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard read failed");
            None
        }
    }
}

fn publish(
    detector: &ContextDetector,
    dispatcher: &Dispatcher,
    content: String,
) -> (ClipboardEvent, PublishReport) {
    let classification = detector.detect(&content);
    let event = ClipboardEvent::new(content, classification);
    tracing::debug!(
        content_type = %event.content_type(),
        confidence = event.confidence(),
        preview = %event.preview,
        "clipboard changed"
    );
    let report = dispatcher.publish(event.clone());
    (event, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NullSource;
    use clipboardai_detect::ContentType;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted reads, then repeats the last one.
    struct ScriptedSource {
        reads: Mutex<VecDeque<Option<String>>>,
        last: Mutex<Option<String>>,
    }

    impl ScriptedSource {
        fn new(reads: &[Option<&str>]) -> Self {
            Self {
                reads: Mutex::new(reads.iter().map(|r| r.map(str::to_string)).collect()),
                last: Mutex::new(None),
            }
        }
    }

    impl ClipboardSource for ScriptedSource {
        fn read(&self) -> Result<String, MonitorError> {
            let mut reads = self.reads.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(next) = reads.pop_front() {
                *last = next;
            }
            last.clone()
                .ok_or_else(|| MonitorError::ClipboardUnavailable("scripted".to_string()))
        }
    }

    fn monitor(source: Arc<dyn ClipboardSource>) -> ClipboardMonitor {
        ClipboardMonitor::new(
            source,
            Arc::new(ContextDetector::new().unwrap()),
            Arc::new(Dispatcher::default()),
        )
    }

    fn wait_for_drain(source: &ScriptedSource) {
        for _ in 0..200 {
            if source.reads.lock().unwrap().is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        // one more tick so the final read is processed
        std::thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_monitor_lifecycle() {
        let mut monitor = monitor(Arc::new(NullSource));
        assert!(!monitor.is_running());

        monitor.start_with_interval(Duration::from_millis(10)).unwrap();
        assert!(monitor.is_running());
        assert!(matches!(
            monitor.start_with_interval(Duration::from_millis(10)),
            Err(MonitorError::AlreadyRunning)
        ));

        monitor.stop();
        assert!(!monitor.is_running());
        assert_eq!(monitor.published_count(), 0);
    }

    #[test]
    fn test_monitor_publishes_each_change_once() {
        let source = Arc::new(ScriptedSource::new(&[
            Some("initial"),
            Some("initial"),
            Some("https://example.com"),
            Some("https://example.com"),
            None,
            Some(""),
            Some("https://example.com"),
            Some("SELECT id FROM users WHERE id = 1"),
        ]));
        let mut monitor = monitor(source.clone());

        monitor.start_with_interval(Duration::from_millis(5)).unwrap();
        wait_for_drain(&source);
        monitor.stop();

        let events = monitor.dispatcher().get_recent(10);
        let types: Vec<ContentType> = events.iter().map(|e| e.content_type()).collect();
        assert_eq!(types, vec![ContentType::Url, ContentType::Sql]);
        assert_eq!(monitor.published_count(), 2);
    }

    #[test]
    fn test_monitor_notifies_observers() {
        let source = Arc::new(ScriptedSource::new(&[None, Some("user@example.com")]));
        let mut monitor = monitor(source.clone());
        let (tx, rx) = crossbeam_channel::unbounded();
        monitor
            .dispatcher()
            .subscribe(Arc::new(crate::ChannelObserver::new(tx)));

        monitor.start_with_interval(Duration::from_millis(5)).unwrap();
        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        monitor.stop();

        assert_eq!(event.content_type(), ContentType::Email);
        assert_eq!(event.content, "user@example.com");
    }

    #[test]
    fn test_process_bypasses_gate() {
        let monitor = monitor(Arc::new(NullSource));
        let (first, report) = monitor.process("plain words here");
        let (second, _) = monitor.process("plain words here");

        assert_eq!(report.failed, 0);
        assert_eq!(first.content_type(), ContentType::PlainText);
        assert_ne!(first.id, second.id);
        assert_eq!(monitor.dispatcher().history_len(), 2);
    }
}
