//! Observer dispatch with a bounded event history.

use clipboardai_events::ClipboardEvent;
use crossbeam_channel::{Sender, TrySendError};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

/// Default number of events kept in the history ring buffer.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Receives every published clipboard event.
///
/// Observers run synchronously on the publishing thread, in subscription
/// order. Slow work should be handed off (see [`ChannelObserver`]).
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &ClipboardEvent) -> anyhow::Result<()>;

    /// Name used when reporting failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Observer for F
where
    F: Fn(&ClipboardEvent) -> anyhow::Result<()> + Send + Sync,
{
    fn on_event(&self, event: &ClipboardEvent) -> anyhow::Result<()> {
        self(event)
    }
}

/// Shared observer handle.
pub type ObserverRef = Arc<dyn Observer>;

/// Result of notifying observers about one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishReport {
    pub notified: usize,
    pub failed: usize,
}

/// Fans events out to observers and keeps the most recent ones.
///
/// A failing observer (error or panic) is logged and skipped; the rest
/// still run.
pub struct Dispatcher {
    observers: Mutex<Vec<ObserverRef>>,
    history: Mutex<VecDeque<ClipboardEvent>>,
    capacity: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl Dispatcher {
    /// Create a dispatcher keeping at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            observers: Mutex::new(Vec::new()),
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn subscribe(&self, observer: ObserverRef) -> &Self {
        self.observers
            .lock()
            .expect("observer list mutex poisoned")
            .push(observer);
        self
    }

    /// Convenience for closures.
    pub fn subscribe_fn<F>(&self, f: F) -> &Self
    where
        F: Fn(&ClipboardEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(f))
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .expect("observer list mutex poisoned")
            .len()
    }

    /// Record `event` in the history, then notify every observer.
    pub fn publish(&self, event: ClipboardEvent) -> PublishReport {
        {
            let mut history = self.history.lock().expect("history mutex poisoned");
            if history.len() == self.capacity {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // Snapshot so observers may subscribe without deadlocking.
        let observers: Vec<ObserverRef> = self
            .observers
            .lock()
            .expect("observer list mutex poisoned")
            .clone();

        let mut report = PublishReport::default();
        for observer in &observers {
            match catch_unwind(AssertUnwindSafe(|| observer.on_event(&event))) {
                Ok(Ok(())) => report.notified += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    tracing::warn!(observer = observer.name(), error = %e, "observer failed");
                }
                Err(panic) => {
                    report.failed += 1;
                    tracing::warn!(
                        observer = observer.name(),
                        panic = panic_message(&panic),
                        "observer panicked"
                    );
                }
            }
        }
        report
    }

    /// The last `n` events, oldest first.
    pub fn get_recent(&self, n: usize) -> Vec<ClipboardEvent> {
        let history = self.history.lock().expect("history mutex poisoned");
        let skip = history.len().saturating_sub(n);
        history.iter().skip(skip).cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().expect("history mutex poisoned").len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear_history(&self) {
        self.history.lock().expect("history mutex poisoned").clear();
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Forwards events to a channel so another thread can do the slow work.
pub struct ChannelObserver {
    sender: Sender<ClipboardEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<ClipboardEvent>) -> Self {
        Self { sender }
    }
}

impl Observer for ChannelObserver {
    fn on_event(&self, event: &ClipboardEvent) -> anyhow::Result<()> {
        match self.sender.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(anyhow::anyhow!("queue full, event dropped")),
            Err(TrySendError::Disconnected(_)) => Err(anyhow::anyhow!("receiver disconnected")),
        }
    }

    fn name(&self) -> &str {
        "channel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipboardai_detect::{ClassificationResult, ContentType};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(content: &str) -> ClipboardEvent {
        let classification =
            ClassificationResult::new(ContentType::PlainText, 0.6, Default::default());
        ClipboardEvent::new(content, classification)
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> ObserverRef {
        let log = Arc::clone(log);
        Arc::new(move |e: &ClipboardEvent| {
            log.lock().unwrap().push(format!("{tag}:{}", e.content));
            Ok(())
        })
    }

    #[test]
    fn test_observers_run_in_subscription_order() {
        let dispatcher = Dispatcher::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.subscribe(recorder(&log, "first"));
        dispatcher.subscribe(recorder(&log, "second"));
        dispatcher.subscribe(recorder(&log, "third"));

        let report = dispatcher.publish(event("x"));

        assert_eq!(report, PublishReport { notified: 3, failed: 0 });
        assert_eq!(*log.lock().unwrap(), vec!["first:x", "second:x", "third:x"]);
    }

    #[test]
    fn test_failing_observer_is_isolated() {
        let dispatcher = Dispatcher::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.subscribe(recorder(&log, "before"));
        dispatcher.subscribe_fn(|e: &ClipboardEvent| {
            if e.content == "bad" {
                anyhow::bail!("cannot handle {}", e.content);
            }
            Ok(())
        });
        dispatcher.subscribe(recorder(&log, "after"));

        let report = dispatcher.publish(event("bad"));
        assert_eq!(report, PublishReport { notified: 2, failed: 1 });

        let report = dispatcher.publish(event("good"));
        assert_eq!(report, PublishReport { notified: 3, failed: 0 });

        assert_eq!(
            *log.lock().unwrap(),
            vec!["before:bad", "after:bad", "before:good", "after:good"]
        );
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let dispatcher = Dispatcher::default();
        let calls = Arc::new(AtomicUsize::new(0));
        dispatcher.subscribe_fn(|e: &ClipboardEvent| -> anyhow::Result<()> {
            if e.content == "boom" {
                panic!("observer exploded");
            }
            Ok(())
        });
        let calls_clone = Arc::clone(&calls);
        dispatcher.subscribe_fn(move |_e: &ClipboardEvent| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let report = dispatcher.publish(event("boom"));
        assert_eq!(report.failed, 1);
        dispatcher.publish(event("fine"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.history_len(), 2);
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let dispatcher = Dispatcher::new(3);
        for i in 0..5 {
            dispatcher.publish(event(&format!("e{i}")));
        }

        let recent: Vec<String> = dispatcher.get_recent(10).into_iter().map(|e| e.content).collect();
        assert_eq!(recent, vec!["e2", "e3", "e4"]);
        assert_eq!(dispatcher.history_len(), 3);
    }

    #[test]
    fn test_default_capacity_keeps_last_fifty() {
        let dispatcher = Dispatcher::default();
        for i in 0..60 {
            dispatcher.publish(event(&format!("e{i}")));
        }

        let recent = dispatcher.get_recent(100);
        assert_eq!(recent.len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(recent.first().unwrap().content, "e10");
        assert_eq!(recent.last().unwrap().content, "e59");
    }

    #[test]
    fn test_get_recent_window_is_chronological() {
        let dispatcher = Dispatcher::default();
        for i in 0..5 {
            dispatcher.publish(event(&format!("e{i}")));
        }

        let recent: Vec<String> = dispatcher.get_recent(2).into_iter().map(|e| e.content).collect();
        assert_eq!(recent, vec!["e3", "e4"]);
        assert!(dispatcher.get_recent(0).is_empty());
    }

    #[test]
    fn test_clear_history() {
        let dispatcher = Dispatcher::default();
        dispatcher.publish(event("a"));
        dispatcher.clear_history();
        assert_eq!(dispatcher.history_len(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let dispatcher = Dispatcher::new(0);
        dispatcher.publish(event("a"));
        dispatcher.publish(event("b"));
        assert_eq!(dispatcher.capacity(), 1);
        assert_eq!(dispatcher.get_recent(5)[0].content, "b");
    }

    #[test]
    fn test_observer_can_subscribe_during_publish() {
        let dispatcher = Arc::new(Dispatcher::default());
        let inner = Arc::clone(&dispatcher);
        dispatcher.subscribe_fn(move |_e: &ClipboardEvent| {
            inner.subscribe_fn(|_e: &ClipboardEvent| Ok(()));
            Ok(())
        });

        dispatcher.publish(event("a"));
        assert_eq!(dispatcher.observer_count(), 2);
    }

    #[test]
    fn test_channel_observer_forwards_events() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        let dispatcher = Dispatcher::default();
        dispatcher.subscribe(Arc::new(ChannelObserver::new(tx)));

        dispatcher.publish(event("queued"));
        assert_eq!(rx.try_recv().unwrap().content, "queued");
    }

    #[test]
    fn test_channel_observer_reports_full_and_disconnected() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let dispatcher = Dispatcher::default();
        dispatcher.subscribe(Arc::new(ChannelObserver::new(tx)));

        assert_eq!(dispatcher.publish(event("one")).failed, 0);
        assert_eq!(dispatcher.publish(event("two")).failed, 1);

        drop(rx);
        assert_eq!(dispatcher.publish(event("three")).failed, 1);
    }
}
