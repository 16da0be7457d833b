//! Fire-and-forget delivery of events to the collection endpoint
//!
//! The Dispatcher sends each event once, through one of two transports:
//! - Beacon: the body is queued for a background worker that keeps
//!   draining after the tracker is gone
//! - Fetch: a task is spawned per event
//!
//! When the beacon queue is closed the event falls back to fetch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{CollectorConfig, Transport};
use crate::error::{Error, Result};
use crate::types::Event;

use super::client::CollectorClient;
use super::events::wire_body;
use super::EventSink;

/// Delivery statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Bodies handed to the beacon queue
    pub queued: usize,
    /// Requests that got any HTTP response
    pub delivered: usize,
    /// Requests that failed at the transport level
    pub failed: usize,
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicUsize,
    delivered: AtomicUsize,
    failed: AtomicUsize,
}

/// Sends events to the collection endpoint without blocking the tracker
pub struct Dispatcher {
    client: Arc<CollectorClient>,
    runtime: Handle,
    transport: Transport,
    beacon: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl Dispatcher {
    /// Create a dispatcher from configuration
    ///
    /// Returns None if the collector is not enabled or not properly configured.
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &CollectorConfig) -> Result<Option<Self>> {
        if !config.is_ready() {
            return Ok(None);
        }

        let runtime = Handle::try_current()
            .map_err(|e| Error::Collector(format!("no async runtime available: {}", e)))?;
        let client = Arc::new(CollectorClient::new(config)?);
        let counters = Arc::new(Counters::default());

        let (beacon, worker) = match config.transport {
            Transport::Beacon => {
                let (tx, rx) = mpsc::unbounded_channel();
                let worker =
                    runtime.spawn(beacon_worker(rx, Arc::clone(&client), Arc::clone(&counters)));
                (Some(tx), Some(worker))
            }
            Transport::Fetch => (None, None),
        };

        tracing::debug!(
            endpoint = %client.endpoint_url(),
            transport = config.transport.as_str(),
            "Dispatcher ready"
        );

        Ok(Some(Self {
            client,
            runtime,
            transport: config.transport,
            beacon: Mutex::new(beacon),
            worker: Mutex::new(worker),
            in_flight: Mutex::new(Vec::new()),
            counters,
        }))
    }

    /// Hand a body to the beacon worker, giving it back if the queue is closed
    fn enqueue(&self, body: Vec<u8>) -> std::result::Result<(), Vec<u8>> {
        let beacon = self.beacon.lock().unwrap();
        match beacon.as_ref() {
            Some(tx) => {
                tx.send(body).map_err(|e| e.0)?;
                self.counters.queued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(body),
        }
    }

    fn fetch(&self, body: Vec<u8>) {
        let handle = self.runtime.spawn(send_once(
            Arc::clone(&self.client),
            Arc::clone(&self.counters),
            body,
        ));

        let mut in_flight = self.in_flight.lock().unwrap();
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }

    /// Get current delivery statistics
    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            queued: self.counters.queued.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Close the beacon queue and wait for outstanding deliveries
    ///
    /// Events delivered after shutdown go through fetch.
    pub async fn shutdown(&self) {
        drop(self.beacon.lock().unwrap().take());

        let worker = self.worker.lock().unwrap().take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }

        let in_flight: Vec<_> = self.in_flight.lock().unwrap().drain(..).collect();
        for handle in in_flight {
            let _ = handle.await;
        }

        let stats = self.stats();
        tracing::debug!(
            queued = stats.queued,
            delivered = stats.delivered,
            failed = stats.failed,
            "Dispatcher drained"
        );
    }
}

impl EventSink for Dispatcher {
    fn deliver(&self, event: &Event) {
        let body = match serde_json::to_vec(&wire_body(event)) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(event = %event.name(), error = %e, "Failed to serialize event");
                return;
            }
        };

        let body = match self.transport {
            Transport::Beacon => match self.enqueue(body) {
                Ok(()) => return,
                Err(body) => {
                    tracing::debug!("Beacon queue closed, falling back to fetch");
                    body
                }
            },
            Transport::Fetch => body,
        };

        self.fetch(body);
    }
}

async fn beacon_worker(
    mut rx: mpsc::UnboundedReceiver<Vec<u8>>,
    client: Arc<CollectorClient>,
    counters: Arc<Counters>,
) {
    while let Some(body) = rx.recv().await {
        send_once(Arc::clone(&client), Arc::clone(&counters), body).await;
    }
}

/// One delivery attempt; failures are logged and counted, never retried
async fn send_once(client: Arc<CollectorClient>, counters: Arc<Counters>, body: Vec<u8>) {
    match client.post(body).await {
        Ok(status) => {
            counters.delivered.fetch_add(1, Ordering::Relaxed);
            if !status.is_success() {
                tracing::debug!(status = %status, "Collection endpoint returned error status");
            }
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "Analytics delivery failed");
        }
    }
}
