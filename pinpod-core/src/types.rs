//! Core domain types for pinpod analytics
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | Identity and timing anchor for one page visit |
//! | **Event** | One recorded occurrence: name, timestamp, session reference, payload |
//! | **Page** | Read-only snapshot of the hosting environment (URL, viewport, elements) |
//! | **Summary** | Counts derived from a session's event log |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Attribute map carried by every event
pub type Payload = serde_json::Map<String, serde_json::Value>;

// ============================================
// Event names
// ============================================

/// Event categories emitted by the tracker itself.
///
/// `Tracker::record` accepts any name; these are the ones the built-in
/// observers produce and the summary filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PageView,
    ScrollDepth,
    TimeOnPage,
    PageExit,
    FormFieldFocus,
    FormSubmit,
    ButtonClick,
    TabClick,
    SectionView,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PageView => "page_view",
            EventKind::ScrollDepth => "scroll_depth",
            EventKind::TimeOnPage => "time_on_page",
            EventKind::PageExit => "page_exit",
            EventKind::FormFieldFocus => "form_field_focus",
            EventKind::FormSubmit => "form_submit",
            EventKind::ButtonClick => "button_click",
            EventKind::TabClick => "tab_click",
            EventKind::SectionView => "section_view",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Session
// ============================================

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One page-visit lifetime.
///
/// Created once per tracker and never changed afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: String,
    start_time: DateTime<Utc>,
}

impl Session {
    /// Start a new session now
    pub fn start() -> Self {
        let start_time = Utc::now();
        Self {
            id: generate_session_id(start_time),
            start_time,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Wall-clock milliseconds since the session started
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.start_time)
            .num_milliseconds()
            .max(0)
    }
}

/// `session_<unix millis>_<9 base-36 chars>`
fn generate_session_id(now: DateTime<Utc>) -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(9);
    for _ in 0..9 {
        suffix.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}

// ============================================
// Event
// ============================================

/// One recorded user or browser occurrence.
///
/// Fields are only readable; an event is never changed after the tracker
/// records it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    name: String,
    timestamp: DateTime<Utc>,
    session_id: String,
    payload: Payload,
}

impl Event {
    pub(crate) fn new(name: &str, session_id: &str, payload: Payload) -> Self {
        Self {
            name: name.to_string(),
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Look up one payload attribute
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.get(key)
    }

    pub fn is(&self, kind: EventKind) -> bool {
        self.name == kind.as_str()
    }
}

// ============================================
// Page environment
// ============================================

/// Width and height in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Read-only snapshot of the hosting page.
///
/// `elements` lists the ids present in the document; observers whose
/// element is missing are not registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub referrer: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub screen: Dimensions,
    #[serde(default)]
    pub viewport: Dimensions,
    #[serde(default)]
    pub elements: BTreeSet<String>,
}

impl PageInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Dimensions::new(width, height);
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Dimensions::new(width, height);
        self
    }

    /// Declare element ids present in the document
    pub fn with_elements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    /// URL path, `/` when the URL does not parse
    pub fn path(&self) -> String {
        reqwest::Url::parse(&self.url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/".to_string())
    }

    /// URL hostname, empty when absent
    pub fn hostname(&self) -> String {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

// ============================================
// Summary
// ============================================

/// Snapshot of a session's activity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    /// Wall-clock milliseconds since the session started
    pub duration_ms: i64,
    /// Total events recorded
    pub events: usize,
    pub page_views: usize,
    pub button_clicks: usize,
    pub form_submissions: usize,
}
