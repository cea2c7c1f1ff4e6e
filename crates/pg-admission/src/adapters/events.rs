//! Event Sink Adapters

use crate::domain::GatewayEvent;
use crate::ports::EventSink;
use parking_lot::Mutex;
use tracing::info;

/// Collects events for inspection.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<GatewayEvent>>,
}

impl InMemoryEventSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far.
    pub fn events(&self) -> Vec<GatewayEvent> {
        self.events.lock().clone()
    }

    /// Take and clear the collected events.
    pub fn drain(&self) -> Vec<GatewayEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, event: GatewayEvent) {
        self.events.lock().push(event);
    }
}

/// Writes events to the log as JSON.
#[derive(Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: GatewayEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => info!(event = %json, "[pg-admission] gateway event"),
            Err(e) => info!(error = %e, ?event, "[pg-admission] gateway event"),
        }
    }
}
