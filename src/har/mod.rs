//! Timing markers and network log.
//!
//! A [`HarLog`] accumulates named timing markers and one [`HarEntry`] per
//! network exchange. It is shared between the engine, which records
//! entries as responses arrive, and the tab, which stamps markers and looks
//! up the entry that caused a URL change. [`HarRecorder`] is the cloneable
//! handle both sides hold.
//!
//! # Markers
//!
//! | Marker | Stamped by |
//! |--------|------------|
//! | `_onStarted` | `go` |
//! | `_onHtmlRendered` | `html` |
//! | `_onScreenshotPrepared` | `screenshot`, after painting |
//! | `_onPngRendered` | `screenshot`, after encoding |
//! | `_onIframesRendered` | `frame_tree` |

// ============================================================================
// Submodules
// ============================================================================

mod entry;

// ============================================================================
// Re-exports
// ============================================================================

pub use entry::{
    HarContent, HarEntry, HarPair, HarRequest, HarResponse, HarTimings, without_private,
};

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::trace;

// ============================================================================
// Constants
// ============================================================================

/// Marker stamped when a navigation starts.
pub const ON_STARTED: &str = "_onStarted";
/// Marker stamped after the document is serialized.
pub const ON_HTML_RENDERED: &str = "_onHtmlRendered";
/// Marker stamped after the viewport is painted.
pub const ON_SCREENSHOT_PREPARED: &str = "_onScreenshotPrepared";
/// Marker stamped after the PNG is encoded.
pub const ON_PNG_RENDERED: &str = "_onPngRendered";
/// Marker stamped after the frame tree is built.
pub const ON_IFRAMES_RENDERED: &str = "_onIframesRendered";

const HAR_VERSION: &str = "1.2";

// ============================================================================
// HarLog
// ============================================================================

/// Accumulated markers and entries for one page.
#[derive(Debug)]
pub struct HarLog {
    created_at: Instant,
    started_date_time: DateTime<Utc>,
    browser: (String, String),
    title: String,
    page_timings: BTreeMap<String, u64>,
    entries: Vec<HarEntry>,
}

impl Default for HarLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HarLog {
    /// Creates an empty log; marker times count from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Instant::now(),
            started_date_time: Utc::now(),
            browser: ("engine".to_string(), String::new()),
            title: String::new(),
            page_timings: BTreeMap::new(),
            entries: Vec::new(),
        }
    }

    /// Sets the browser name and version reported in the log.
    #[must_use]
    pub fn with_browser(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.browser = (name.into(), version.into());
        self
    }

    /// Records `name` at the elapsed milliseconds since creation.
    ///
    /// Stamping the same marker again overwrites it.
    pub fn store_timing(&mut self, name: &str) -> u64 {
        let elapsed = self.created_at.elapsed().as_millis() as u64;
        trace!(marker = name, elapsed_ms = elapsed, "HAR event");
        self.page_timings.insert(name.to_string(), elapsed);
        elapsed
    }

    /// Returns a stored marker.
    #[must_use]
    pub fn timing(&self, name: &str) -> Option<u64> {
        self.page_timings.get(name).copied()
    }

    /// Sets the page title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Appends an entry and returns its index.
    pub fn add_entry(&mut self, entry: HarEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Returns all entries in arrival order.
    #[must_use]
    pub fn entries(&self) -> &[HarEntry] {
        &self.entries
    }

    /// Finds the most recent entry for `url` at or before index `last`.
    ///
    /// `None` searches the whole log.
    #[must_use]
    pub fn prev_entry(&self, url: &str, last: Option<usize>) -> Option<&HarEntry> {
        let end = match last {
            Some(idx) => (idx + 1).min(self.entries.len()),
            None => self.entries.len(),
        };
        self.entries[..end]
            .iter()
            .rev()
            .find(|entry| entry.matches_url(url))
    }

    /// Serializes the log in HAR layout.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "log": {
                "version": HAR_VERSION,
                "creator": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "browser": {
                    "name": self.browser.0,
                    "version": self.browser.1,
                },
                "pages": [{
                    "startedDateTime": self.started_date_time,
                    "id": "1",
                    "title": self.title,
                    "pageTimings": self.page_timings,
                }],
                "entries": self.entries,
            }
        })
    }
}

// ============================================================================
// HarRecorder
// ============================================================================

/// Shared handle to a [`HarLog`].
#[derive(Debug, Clone, Default)]
pub struct HarRecorder {
    inner: Arc<Mutex<HarLog>>,
}

impl HarRecorder {
    /// Creates a recorder around a fresh log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing log.
    #[must_use]
    pub fn from_log(log: HarLog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(log)),
        }
    }

    /// Stamps a timing marker.
    pub fn store_timing(&self, name: &str) -> u64 {
        self.inner.lock().store_timing(name)
    }

    /// Returns a stored marker.
    #[must_use]
    pub fn timing(&self, name: &str) -> Option<u64> {
        self.inner.lock().timing(name)
    }

    /// Appends a network entry. Called by the engine.
    pub fn record(&self, entry: HarEntry) -> usize {
        self.inner.lock().add_entry(entry)
    }

    /// Sets the page title.
    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.lock().set_title(title);
    }

    /// Returns a copy of the latest entry for `url`.
    #[must_use]
    pub fn prev_entry(&self, url: &str) -> Option<HarEntry> {
        self.inner.lock().prev_entry(url, None).cloned()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries().len()
    }

    /// Returns `true` if no entry was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries().is_empty()
    }

    /// Serializes the log in HAR layout.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.inner.lock().to_value()
    }
}

// ============================================================================
// Tests
// ============================================================================
