//! # pinpod-core
//!
//! Core library for PinPod - landing-page analytics and early-access
//! registration.
//!
//! This library provides:
//! - A per-visit event tracker fed by browser signals
//! - Fire-and-forget delivery of tracked events to a collection endpoint
//! - Early-access registration against a PostgREST backend
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Events flow one way:
//! - **Signals:** scroll, tick, focus, submit, click, intersection, unload
//! - **Tracker:** turns signals into named events and keeps the session log
//! - **Sink:** delivers each event; failures never reach the tracker
//!
//! ## Example
//!
//! ```rust,no_run
//! use pinpod_core::collector::{Dispatcher, NullSink};
//! use pinpod_core::tracker::{ReplayScript, Tracker};
//! use pinpod_core::Config;
//!
//! # async fn run() -> pinpod_core::Result<()> {
//! let config = Config::load()?;
//! let script = ReplayScript::load("visit.json".as_ref())?;
//!
//! match Dispatcher::new(&config.collector)? {
//!     Some(dispatcher) => {
//!         let mut tracker = Tracker::new(script.page, config.tracker, &dispatcher);
//!         script.signals.into_iter().for_each(|s| tracker.handle(s));
//!         dispatcher.shutdown().await;
//!     }
//!     None => {
//!         let mut tracker = Tracker::new(script.page, config.tracker, NullSink);
//!         script.signals.into_iter().for_each(|s| tracker.handle(s));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use collector::{Dispatcher, EventSink};
pub use config::Config;
pub use error::{Error, Result};
pub use tracker::Tracker;
pub use types::*;

// Public modules
pub mod collector;
pub mod config;
pub mod dom;
pub mod error;
pub mod format;
pub mod logging;
pub mod registration;
pub mod tracker;
pub mod types;
