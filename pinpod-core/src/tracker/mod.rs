//! Event tracker
//!
//! Captures user-interaction and lifecycle events for one page visit, tags
//! them with the session, appends them to an in-memory log and hands each
//! one to an [`EventSink`].
//!
//! ## Observers
//!
//! | Observer | Signal | Event |
//! |----------|--------|-------|
//! | scroll | `Scroll` | `scroll_depth` at 25/50/75/100 |
//! | timer | `Tick` | `time_on_page` every 30s |
//! | form (if present) | `FocusIn`, `Submit` | `form_field_focus`, `form_submit` |
//! | clicks | `Click` | `tab_click`, `button_click` |
//! | sections (if present) | `Intersection` | `section_view` |
//! | unload | `Unload` | `page_exit` |
//!
//! ## Example
//!
//! ```rust
//! use pinpod_core::collector::MemorySink;
//! use pinpod_core::config::TrackerConfig;
//! use pinpod_core::tracker::{BrowserSignal, ScrollMetrics, Tracker};
//! use pinpod_core::PageInfo;
//!
//! let page = PageInfo::new("https://pinpod.example.com/").with_viewport(1280, 1000);
//! let mut tracker = Tracker::new(page, TrackerConfig::default(), MemorySink::new());
//!
//! tracker.handle(BrowserSignal::Scroll(ScrollMetrics {
//!     scroll_top: 250.0,
//!     document_height: 2000.0,
//!     viewport_height: 1000.0,
//! }));
//!
//! assert_eq!(tracker.events().len(), 2);
//! ```

mod engagement;
mod signal;

use std::collections::BTreeSet;

use serde_json::{json, Value};

pub use engagement::{
    ScrollDepth, SectionVisibility, TimeOnPage, SCROLL_STEP, SECTION_VISIBILITY_THRESHOLD,
    TIME_ON_PAGE_INTERVAL_SECS,
};
pub use signal::{BrowserSignal, ReplayScript, ScrollMetrics};

use crate::collector::{wire_body, EventSink};
use crate::config::TrackerConfig;
use crate::dom::ElementPath;
use crate::types::{Event, EventKind, PageInfo, Payload, Session, SessionSummary};

/// Section tag used when a click is outside every known section
pub const UNKNOWN_SECTION: &str = "unknown";

/// Observers that found their element on the page
#[derive(Debug, Default)]
struct Observers {
    form: bool,
    sections: BTreeSet<String>,
}

impl Observers {
    fn register(page: &PageInfo, config: &TrackerConfig) -> Self {
        Self {
            form: page.has_element(&config.form_id),
            sections: config
                .sections
                .iter()
                .filter(|id| page.has_element(id))
                .cloned()
                .collect(),
        }
    }
}

/// Analytics tracker for one page visit
pub struct Tracker<S: EventSink> {
    session: Session,
    page: PageInfo,
    config: TrackerConfig,
    observers: Observers,
    log: Vec<Event>,
    scroll: ScrollDepth,
    time: TimeOnPage,
    sections: SectionVisibility,
    mirror: bool,
    unloaded: bool,
    sink: S,
}

impl<S: EventSink> Tracker<S> {
    /// Start a session on `page` and emit its `page_view`
    pub fn new(page: PageInfo, config: TrackerConfig, sink: S) -> Self {
        let observers = Observers::register(&page, &config);
        let mirror = config.is_dev_host(&page.hostname());

        if !observers.form {
            tracing::debug!(form_id = %config.form_id, "Form not on page, skipping form observer");
        }
        for missing in config
            .sections
            .iter()
            .filter(|id| !observers.sections.contains(*id))
        {
            tracing::debug!(section = %missing, "Section not on page, skipping visibility observer");
        }

        let mut tracker = Self {
            session: Session::start(),
            page,
            config,
            observers,
            log: Vec::new(),
            scroll: ScrollDepth::new(),
            time: TimeOnPage::new(),
            sections: SectionVisibility::new(),
            mirror,
            unloaded: false,
            sink,
        };

        tracing::info!(
            session_id = %tracker.session.id(),
            page = %tracker.page.path(),
            "Tracker started"
        );

        tracker.track_page_view();
        tracker
    }

    fn track_page_view(&mut self) {
        let data = json!({
            "page": self.page.path(),
            "title": self.page.title,
            "url": self.page.url,
            "referrer": self.page.referrer,
            "userAgent": self.page.user_agent,
            "screenResolution": self.page.screen.to_string(),
            "viewport": self.page.viewport.to_string(),
        });
        self.emit(EventKind::PageView, data);
    }

    /// Record an event and hand it to the sink
    ///
    /// The payload is passed through untouched.
    pub fn record(&mut self, name: &str, payload: Payload) {
        let event = Event::new(name, self.session.id(), payload);
        self.log.push(event);

        if let Some(event) = self.log.last() {
            self.sink.deliver(event);

            if self.mirror {
                tracing::info!(
                    target: "pinpod::analytics",
                    body = %wire_body(event),
                    "Analytics event"
                );
            }
        }
    }

    fn emit(&mut self, kind: EventKind, data: Value) {
        let payload = match data {
            Value::Object(map) => map,
            _ => Payload::new(),
        };
        self.record(kind.as_str(), payload);
    }

    /// Dispatch one browser signal to its observer
    pub fn handle(&mut self, signal: BrowserSignal) {
        match signal {
            BrowserSignal::Scroll(metrics) => self.on_scroll(&metrics),
            BrowserSignal::Tick => self.on_tick(),
            BrowserSignal::FocusIn { path } => self.on_focus_in(&path),
            BrowserSignal::Submit { form_id } => self.on_submit(&form_id),
            BrowserSignal::Click { path } => self.on_click(&path),
            BrowserSignal::Intersection { section, ratio } => {
                self.on_intersection(&section, ratio)
            }
            BrowserSignal::Unload => self.on_unload(),
        }
    }

    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) {
        if self.unloaded {
            return;
        }
        if let Some(depth) = self.scroll.observe(metrics) {
            self.emit(EventKind::ScrollDepth, json!({ "depth": depth }));
        }
    }

    /// One second of the interval timer
    pub fn on_tick(&mut self) {
        if self.unloaded {
            return;
        }
        if let Some(seconds) = self.time.tick() {
            self.emit(EventKind::TimeOnPage, json!({ "seconds": seconds }));
        }
    }

    /// Focus entered an element; only fields inside the tracked form count
    pub fn on_focus_in(&mut self, path: &ElementPath) {
        if self.unloaded || !self.observers.form || !path.contains_id(&self.config.form_id) {
            return;
        }
        let Some(target) = path.target().filter(|el| el.is_form_field()) else {
            return;
        };

        let data = json!({
            "field": target.field_label(),
            "form": self.config.form_name,
        });
        self.emit(EventKind::FormFieldFocus, data);
    }

    /// The submission outcome is not awaited; `success` is always true
    pub fn on_submit(&mut self, form_id: &str) {
        if self.unloaded || !self.observers.form || form_id != self.config.form_id {
            return;
        }
        let data = json!({
            "form": self.config.form_name,
            "success": true,
        });
        self.emit(EventKind::FormSubmit, data);
    }

    /// Clicks on (or inside) buttons; tab buttons also report their tab
    pub fn on_click(&mut self, path: &ElementPath) {
        if self.unloaded {
            return;
        }
        let Some((index, button)) = path.closest_button() else {
            return;
        };

        if button.has_class("tab-btn") {
            let tab = button.attribute("data-tab");
            self.emit(EventKind::TabClick, json!({ "tab": tab }));
        }

        let section = path
            .ancestors_of(index)
            .filter_map(|el| el.id.as_deref())
            .find(|id| self.config.sections.iter().any(|s| s == *id))
            .unwrap_or(UNKNOWN_SECTION);

        let data = json!({
            "text": button.text.trim(),
            "class": button.class_name,
            "location": {
                "x": button.rect.left.round() as i64,
                "y": button.rect.top.round() as i64,
                "section": section,
            },
        });
        self.emit(EventKind::ButtonClick, data);
    }

    /// Visibility ratio sample for a section
    pub fn on_intersection(&mut self, section: &str, ratio: f64) {
        if self.unloaded || !self.observers.sections.contains(section) {
            return;
        }
        if self.sections.observe(section, ratio) {
            self.emit(EventKind::SectionView, json!({ "section": section }));
        }
    }

    /// Emit `page_exit` and stop observing
    ///
    /// `timeOnPage` is tick-counted; `sessionDuration` is wall-clock.
    pub fn on_unload(&mut self) {
        if self.unloaded {
            return;
        }
        let session_duration = (self.session.elapsed_ms() as f64 / 1000.0).round() as i64;
        let data = json!({
            "timeOnPage": self.time.elapsed_secs(),
            "sessionDuration": session_duration,
        });
        self.emit(EventKind::PageExit, data);
        self.unloaded = true;

        tracing::info!(
            session_id = %self.session.id(),
            events = self.log.len(),
            "Tracker stopped"
        );
    }

    /// Counts over the event log
    pub fn summary(&self) -> SessionSummary {
        let count = |kind: EventKind| self.log.iter().filter(|e| e.is(kind)).count();

        SessionSummary {
            session_id: self.session.id().to_string(),
            start_time: self.session.start_time(),
            duration_ms: self.session.elapsed_ms(),
            events: self.log.len(),
            page_views: count(EventKind::PageView),
            button_clicks: count(EventKind::ButtonClick),
            form_submissions: count(EventKind::FormSubmit),
        }
    }

    /// Recorded events in insertion order
    pub fn events(&self) -> &[Event] {
        &self.log
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page(&self) -> &PageInfo {
        &self.page
    }

    /// Tick-counted seconds on the page
    pub fn time_on_page(&self) -> u64 {
        self.time.elapsed_secs()
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MemorySink;
    use crate::dom::Element;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn landing_page() -> PageInfo {
        PageInfo::new("https://pinpod.example.com/")
            .with_title("PinPod")
            .with_referrer("https://google.com/")
            .with_user_agent("Mozilla/5.0 (test)")
            .with_screen(1920, 1080)
            .with_viewport(1280, 1000)
            .with_elements(["earlyAccessForm", "konsep", "fitur", "skenario", "bergabung"])
    }

    fn tracker() -> Tracker<MemorySink> {
        Tracker::new(landing_page(), TrackerConfig::default(), MemorySink::new())
    }

    fn scroll(top: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: top,
            document_height: 2000.0,
            viewport_height: 1000.0,
        }
    }

    fn names(tracker: &Tracker<MemorySink>) -> Vec<&str> {
        tracker.events().iter().map(|e| e.name()).collect()
    }

    fn last<S: EventSink>(tracker: &Tracker<S>) -> &Event {
        tracker.events().last().unwrap()
    }

    /// Counts attempts and drops every event, like a dead network
    #[derive(Default)]
    struct FailingSink {
        attempts: Cell<usize>,
    }

    impl EventSink for FailingSink {
        fn deliver(&self, _event: &Event) {
            self.attempts.set(self.attempts.get() + 1);
        }
    }

    #[test]
    fn test_initialization_emits_page_view() {
        let tracker = tracker();

        assert_eq!(names(&tracker), vec!["page_view"]);
        let view = last(&tracker);
        assert_eq!(view.get("page").unwrap(), "/");
        assert_eq!(view.get("referrer").unwrap(), "https://google.com/");
        assert_eq!(view.get("userAgent").unwrap(), "Mozilla/5.0 (test)");
        assert_eq!(view.get("viewport").unwrap(), "1280x1000");
        assert_eq!(view.get("screenResolution").unwrap(), "1920x1080");
        assert_eq!(tracker.sink().len(), 1);
    }

    #[test]
    fn test_session_id_shared_by_all_events() {
        let mut tracker = tracker();
        tracker.record("custom", Payload::new());
        tracker.on_scroll(&scroll(250.0));
        for _ in 0..30 {
            tracker.on_tick();
        }
        tracker.on_unload();

        let id = tracker.session().id();
        assert_eq!(tracker.events().len(), 5);
        assert!(tracker.events().iter().all(|e| e.session_id() == id));
    }

    #[test]
    fn test_record_appends_in_call_order() {
        let mut tracker = tracker();
        let before = tracker.events().len();

        for i in 0..10 {
            let mut payload = Payload::new();
            payload.insert("i".to_string(), json!(i));
            tracker.record(&format!("event_{}", i), payload);
        }

        assert_eq!(tracker.events().len(), before + 10);
        for (i, event) in tracker.events()[before..].iter().enumerate() {
            assert_eq!(event.name(), format!("event_{}", i));
            assert_eq!(event.get("i").unwrap(), i);
        }
        assert_eq!(tracker.sink().delivered(), tracker.events());
    }

    #[test]
    fn test_record_passes_payload_through() {
        let mut tracker = tracker();
        let mut payload = Payload::new();
        payload.insert("nested".to_string(), json!({"odd": [1, null, "x"]}));
        tracker.record("anything", payload.clone());

        assert_eq!(last(&tracker).payload(), &payload);
    }

    #[test]
    fn test_scroll_scenario_from_quarter_depth() {
        let mut tracker = tracker();
        tracker.on_scroll(&scroll(250.0));
        tracker.on_scroll(&scroll(260.0));
        tracker.on_scroll(&scroll(250.0));

        let depths: Vec<_> = tracker
            .events()
            .iter()
            .filter(|e| e.is(EventKind::ScrollDepth))
            .collect();
        assert_eq!(depths.len(), 1);
        assert_eq!(depths[0].get("depth").unwrap(), 25);
    }

    #[test]
    fn test_scroll_depths_increase_once_each() {
        let mut tracker = tracker();
        for top in (0..=1000).step_by(10).chain((0..=1000).rev().step_by(10)) {
            tracker.on_scroll(&scroll(top as f64));
        }

        let depths: Vec<u64> = tracker
            .events()
            .iter()
            .filter(|e| e.is(EventKind::ScrollDepth))
            .map(|e| e.get("depth").unwrap().as_u64().unwrap())
            .collect();
        assert_eq!(depths, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_unscrollable_page_never_reports_depth() {
        let mut tracker = tracker();
        for top in [0.0, 10.0, 500.0] {
            tracker.on_scroll(&ScrollMetrics {
                scroll_top: top,
                document_height: 1000.0,
                viewport_height: 1000.0,
            });
        }
        assert_eq!(names(&tracker), vec!["page_view"]);
    }

    #[test]
    fn test_time_on_page_every_thirty_seconds() {
        let mut tracker = tracker();
        for _ in 0..100 {
            tracker.handle(BrowserSignal::Tick);
        }

        let seconds: Vec<u64> = tracker
            .events()
            .iter()
            .filter(|e| e.is(EventKind::TimeOnPage))
            .map(|e| e.get("seconds").unwrap().as_u64().unwrap())
            .collect();
        assert_eq!(seconds, vec![30, 60, 90]);
        assert_eq!(tracker.time_on_page(), 100);
    }

    #[test]
    fn test_page_exit_carries_both_durations() {
        let mut tracker = tracker();
        for _ in 0..45 {
            tracker.on_tick();
        }
        tracker.on_unload();

        let exit = last(&tracker);
        assert!(exit.is(EventKind::PageExit));
        assert_eq!(exit.get("timeOnPage").unwrap(), 45);
        assert!(exit.get("sessionDuration").unwrap().as_i64().unwrap() >= 0);
    }

    #[test]
    fn test_signals_ignored_after_unload() {
        let mut tracker = tracker();
        tracker.on_unload();
        tracker.on_unload();
        let count = tracker.events().len();

        tracker.on_scroll(&scroll(1000.0));
        for _ in 0..30 {
            tracker.on_tick();
        }
        tracker.on_submit("earlyAccessForm");

        assert!(tracker.is_unloaded());
        assert_eq!(tracker.events().len(), count);
        assert_eq!(names(&tracker), vec!["page_view", "page_exit"]);

        tracker.record("manual", Payload::new());
        assert_eq!(tracker.events().len(), count + 1);
    }

    #[test]
    fn test_form_focus_and_submit() {
        let mut tracker = tracker();
        let form = Element::new("FORM").with_id("earlyAccessForm");

        tracker.on_focus_in(&ElementPath::new(vec![
            Element::new("INPUT").with_name("email"),
            form.clone(),
        ]));
        tracker.on_focus_in(&ElementPath::new(vec![
            Element::new("SELECT").with_id("interest"),
            form.clone(),
        ]));
        // Not a tracked field
        tracker.on_focus_in(&ElementPath::new(vec![
            Element::new("BUTTON"),
            form.clone(),
        ]));
        // Outside the form
        tracker.on_focus_in(&ElementPath::new(vec![Element::new("INPUT").with_name("search")]));
        tracker.on_submit("earlyAccessForm");
        tracker.on_submit("newsletter");

        assert_eq!(
            names(&tracker),
            vec!["page_view", "form_field_focus", "form_field_focus", "form_submit"]
        );
        let events = tracker.events();
        assert_eq!(events[1].get("field").unwrap(), "email");
        assert_eq!(events[1].get("form").unwrap(), "early_access");
        assert_eq!(events[2].get("field").unwrap(), "interest");
        assert_eq!(events[3].get("success").unwrap(), true);
    }

    #[test]
    fn test_form_observer_skipped_when_form_missing() {
        let page = PageInfo::new("https://pinpod.example.com/").with_elements(["fitur"]);
        let mut tracker = Tracker::new(page, TrackerConfig::default(), MemorySink::new());

        tracker.on_focus_in(&ElementPath::new(vec![
            Element::new("INPUT").with_name("email"),
            Element::new("FORM").with_id("earlyAccessForm"),
        ]));
        tracker.on_submit("earlyAccessForm");

        assert_eq!(names(&tracker), vec!["page_view"]);
    }

    #[test]
    fn test_button_click_inside_section() {
        let mut tracker = tracker();
        tracker.on_click(&ElementPath::new(vec![
            Element::new("SPAN").with_text("ignored"),
            Element::new("BUTTON")
                .with_text("  Gabung Sekarang \n")
                .with_class("btn btn-primary")
                .with_rect(120.4, 640.6),
            Element::new("DIV").with_id("cta"),
            Element::new("SECTION").with_id("bergabung"),
            Element::new("BODY"),
        ]));

        let click = last(&tracker);
        assert!(click.is(EventKind::ButtonClick));
        assert_eq!(click.get("text").unwrap(), "Gabung Sekarang");
        assert_eq!(click.get("class").unwrap(), "btn btn-primary");
        assert_eq!(
            click.get("location").unwrap(),
            &json!({"x": 120, "y": 641, "section": "bergabung"})
        );
    }

    #[test]
    fn test_button_click_outside_sections_is_unknown() {
        let mut tracker = tracker();
        tracker.on_click(&ElementPath::new(vec![
            Element::new("BUTTON").with_text("Menu"),
            Element::new("NAV").with_id("navbar"),
        ]));

        assert_eq!(last(&tracker).get("location").unwrap()["section"], "unknown");
    }

    #[test]
    fn test_non_button_click_ignored() {
        let mut tracker = tracker();
        tracker.on_click(&ElementPath::new(vec![
            Element::new("A").with_text("Fitur"),
            Element::new("SECTION").with_id("fitur"),
        ]));
        tracker.on_click(&ElementPath::default());

        assert_eq!(names(&tracker), vec!["page_view"]);
    }

    #[test]
    fn test_tab_click_precedes_button_click() {
        let mut tracker = tracker();
        tracker.on_click(&ElementPath::new(vec![
            Element::new("BUTTON")
                .with_text("Kreator")
                .with_class("tab-btn active")
                .with_attribute("data-tab", "creator"),
            Element::new("SECTION").with_id("fitur"),
        ]));

        assert_eq!(names(&tracker), vec!["page_view", "tab_click", "button_click"]);
        assert_eq!(tracker.events()[1].get("tab").unwrap(), "creator");
        assert_eq!(
            tracker.events()[2].get("location").unwrap()["section"],
            "fitur"
        );
    }

    #[test]
    fn test_section_view_on_every_transition() {
        let mut tracker = tracker();
        for ratio in [0.6, 0.8, 0.2, 0.5, 0.0] {
            tracker.on_intersection("fitur", ratio);
        }
        tracker.on_intersection("konsep", 0.49);

        let views: Vec<_> = tracker
            .events()
            .iter()
            .filter(|e| e.is(EventKind::SectionView))
            .collect();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|e| e.get("section").unwrap() == "fitur"));
    }

    #[test]
    fn test_missing_section_not_observed() {
        let page = PageInfo::new("https://pinpod.example.com/").with_elements(["konsep"]);
        let mut tracker = Tracker::new(page, TrackerConfig::default(), MemorySink::new());

        tracker.on_intersection("fitur", 1.0);
        tracker.on_intersection("konsep", 1.0);
        tracker.on_intersection("footer", 1.0);

        assert_eq!(names(&tracker), vec!["page_view", "section_view"]);
        assert_eq!(last(&tracker).get("section").unwrap(), "konsep");
    }

    #[test]
    fn test_summary_counts_filtered_events() {
        let mut tracker = tracker();
        tracker.record("page_view", Payload::new());
        tracker.record("page_view", Payload::new());
        tracker.record("button_click", Payload::new());
        tracker.record("button_click", Payload::new());
        tracker.record("scroll_depth", Payload::new());

        let summary = tracker.summary();
        assert_eq!(summary.session_id, tracker.session().id());
        assert_eq!(summary.start_time, tracker.session().start_time());
        assert_eq!(summary.events, 6);
        assert_eq!(summary.page_views, 3);
        assert_eq!(summary.button_clicks, 2);
        assert_eq!(summary.form_submissions, 0);
        assert!(summary.duration_ms >= 0);

        // Pure read
        assert_eq!(tracker.summary().events, 6);
        assert_eq!(tracker.events().len(), 6);
    }

    #[test]
    fn test_failed_delivery_does_not_stop_recording() {
        let mut tracker = Tracker::new(
            landing_page(),
            TrackerConfig::default(),
            FailingSink::default(),
        );
        tracker.record("a", Payload::new());
        tracker.record("b", Payload::new());
        tracker.on_unload();

        assert_eq!(tracker.events().len(), 4);
        assert_eq!(tracker.sink().attempts.get(), 4);
    }

    /// Shared buffer the scoped subscriber writes formatted lines into
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` under an info-level subscriber and return what it logged
    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn mirrored_lines(logs: &str) -> Vec<&str> {
        logs.lines()
            .filter(|line| line.contains("pinpod::analytics") && line.contains("Analytics event"))
            .collect()
    }

    #[test]
    fn test_dev_host_mirrors_events_to_log() {
        let logs = capture_logs(|| {
            let page = PageInfo::new("http://localhost:5500/index.html");
            let mut tracker = Tracker::new(page, TrackerConfig::default(), MemorySink::new());
            tracker.record("debug", Payload::new());

            assert_eq!(tracker.sink().len(), 2);
            assert_eq!(tracker.events()[0].get("page").unwrap(), "/index.html");
        });

        let lines = mirrored_lines(&logs);
        assert_eq!(lines.len(), 2, "{logs}");
        assert!(lines[0].contains(r#""event":"page_view""#), "{logs}");
        assert!(lines[1].contains(r#""event":"debug""#), "{logs}");
        assert!(lines.iter().all(|l| l.contains(r#""sessionId":"session_"#)));
    }

    #[test]
    fn test_production_host_does_not_mirror() {
        let logs = capture_logs(|| {
            let mut tracker = tracker();
            tracker.record("debug", Payload::new());
            assert_eq!(tracker.sink().len(), 2);
        });

        assert!(mirrored_lines(&logs).is_empty(), "{logs}");
        // The subscriber was live: lifecycle logging still came through
        assert!(logs.contains("Tracker started"), "{logs}");
    }
}
