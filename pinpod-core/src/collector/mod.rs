//! Analytics collection endpoint delivery
//!
//! Every event the tracker records is handed to an [`EventSink`] exactly
//! once. Delivery is best-effort:
//! - A sink never blocks the caller and never reports failure back
//! - Network failures are logged and counted, not retried
//! - In-flight deliveries may reach the endpoint out of order
//!
//! ## Usage
//!
//! Enable delivery in `~/.config/pinpod/config.toml`:
//!
//! ```toml
//! [collector]
//! enabled = true
//! base_url = "https://pinpod.example.com"
//! endpoint = "/api/analytics"
//! transport = "beacon"
//! ```

mod client;
mod dispatcher;
mod events;

use std::sync::{Arc, Mutex};

pub use client::CollectorClient;
pub use dispatcher::{DeliveryStats, Dispatcher};
pub use events::{format_timestamp, wire_body};

use crate::types::Event;

/// Destination for recorded events
///
/// Implementations must return promptly and swallow their own failures.
pub trait EventSink {
    fn deliver(&self, event: &Event);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn deliver(&self, event: &Event) {
        (**self).deliver(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn deliver(&self, event: &Event) {
        (**self).deliver(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn deliver(&self, event: &Event) {
        (**self).deliver(event)
    }
}

/// Discards every event (collector disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&self, _event: &Event) {}
}

/// Keeps a copy of every delivered event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the events delivered so far, in delivery order
    pub fn delivered(&self) -> Vec<Event> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn deliver(&self, event: &Event) {
        self.delivered.lock().unwrap().push(event.clone());
    }
}
