//! Change event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::ChangeEvent;

/// Trait for receiving change events.
///
/// Services emit events through this trait after a mutation is confirmed
/// by the store. `emit()` must be fast and non-blocking; failure to
/// deliver must not affect the mutation itself (best-effort fan-out).
pub trait ChangeEventSink: Send + Sync {
    fn emit(&self, event: ChangeEvent);
}

/// No-op implementation for contexts that don't broadcast.
#[derive(Clone, Default)]
pub struct NoOpChangeEventSink;

impl ChangeEventSink for NoOpChangeEventSink {
    fn emit(&self, _event: ChangeEvent) {}
}

/// Collecting sink for tests.
#[derive(Clone, Default)]
pub struct CollectingChangeEventSink {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl CollectingChangeEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl ChangeEventSink for CollectingChangeEventSink {
    fn emit(&self, event: ChangeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_records_in_order() {
        let sink = CollectingChangeEventSink::new();
        assert!(sink.is_empty());

        sink.emit(ChangeEvent::Cleared { category: None });
        sink.emit(ChangeEvent::Cleared {
            category: Some("science".into()),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events()[1].category(), Some("science"));

        sink.clear();
        assert!(sink.is_empty());
    }
}
