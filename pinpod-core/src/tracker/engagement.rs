//! Engagement metrics: scroll depth, time on page, section visibility
//!
//! Each metric is a small state machine fed by one kind of browser signal.
//! It answers whether the signal crosses a reporting threshold; the tracker
//! turns a crossing into an event.

use std::collections::HashMap;

use super::signal::ScrollMetrics;

/// Scroll depth is reported at these multiples
pub const SCROLL_STEP: i64 = 25;

/// Time on page is reported every this many seconds
pub const TIME_ON_PAGE_INTERVAL_SECS: u64 = 30;

/// Share of a section that must be visible to count as viewed
pub const SECTION_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Scroll-depth high-water mark
#[derive(Debug, Default)]
pub struct ScrollDepth {
    max_percent: i64,
}

impl ScrollDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounded percentage of the scrollable range, None when the document
    /// cannot scroll
    pub fn percent(metrics: &ScrollMetrics) -> Option<i64> {
        let range = metrics.document_height - metrics.viewport_height;
        if range <= 0.0 || !range.is_finite() {
            return None;
        }

        let percent = (metrics.scroll_top / range * 100.0).round();
        percent.is_finite().then_some(percent as i64)
    }

    /// Feed one scroll position, returning the depth to report if any
    ///
    /// The mark rises with every new maximum; only maxima that land exactly
    /// on 25, 50, 75 or 100 are reported.
    pub fn observe(&mut self, metrics: &ScrollMetrics) -> Option<u32> {
        let percent = Self::percent(metrics)?;
        if percent <= self.max_percent {
            return None;
        }

        self.max_percent = percent;
        let reportable =
            (SCROLL_STEP..=100).contains(&percent) && percent % SCROLL_STEP == 0;
        reportable.then_some(percent as u32)
    }

    pub fn max_percent(&self) -> i64 {
        self.max_percent
    }
}

/// Tick-counted seconds on the page
#[derive(Debug, Default)]
pub struct TimeOnPage {
    elapsed_secs: u64,
}

impl TimeOnPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one second, returning the elapsed seconds on report ticks
    pub fn tick(&mut self) -> Option<u64> {
        self.elapsed_secs += 1;
        (self.elapsed_secs % TIME_ON_PAGE_INTERVAL_SECS == 0).then_some(self.elapsed_secs)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }
}

/// Threshold crossings per section
#[derive(Debug, Default)]
pub struct SectionVisibility {
    visible: HashMap<String, bool>,
}

impl SectionVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a visibility ratio; true when the section just became visible
    ///
    /// Sections can become visible any number of times.
    pub fn observe(&mut self, section: &str, ratio: f64) -> bool {
        let visible = ratio >= SECTION_VISIBILITY_THRESHOLD;
        let was_visible = self
            .visible
            .insert(section.to_string(), visible)
            .unwrap_or(false);
        visible && !was_visible
    }
}
