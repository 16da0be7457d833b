//! Browser signals fed to the tracker
//!
//! A signal is one browser-side occurrence (scroll, timer tick, click, ...).
//! Recorded visits are stored as a [`ReplayScript`]: the page snapshot plus
//! the signals in the order they happened.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::ElementPath;
use crate::error::{Error, Result};
use crate::types::PageInfo;

/// Scroll position and document geometry in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

/// One browser-side occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserSignal {
    /// Window scrolled
    Scroll(ScrollMetrics),
    /// One-second interval timer fired
    Tick,
    /// Focus entered an element; path runs from the target outwards
    FocusIn { path: ElementPath },
    /// A form was submitted
    Submit { form_id: String },
    /// Click landed on the first element of the path
    Click { path: ElementPath },
    /// Visibility ratio of a section changed
    Intersection { section: String, ratio: f64 },
    /// Page is being unloaded
    Unload,
}

/// A recorded page visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    pub page: PageInfo,
    #[serde(default)]
    pub signals: Vec<BrowserSignal>,
}

impl ReplayScript {
    /// Load a script from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("invalid replay script {:?}: {}", path, e))
        })
    }
}
