//! Verbosity-gated render log.
//!
//! Tabs log through `tracing` like the rest of the crate, but the render
//! log also honors a per-tab verbosity so one noisy tab can be inspected
//! without raising the global filter. Every line carries the tab's `uid`.
//!
//! | `min_level` | tracing level |
//! |-------------|---------------|
//! | 0, 1 | `INFO` |
//! | 2 | `DEBUG` |
//! | 3+ | `TRACE` |

use tracing::{debug, info, trace};

use crate::identifiers::TabUid;

// ============================================================================
// TabLogger
// ============================================================================

/// Render log sink for a single tab.
#[derive(Debug, Clone, Copy)]
pub struct TabLogger {
    uid: TabUid,
    verbosity: u8,
}

impl TabLogger {
    /// Creates a logger.
    #[inline]
    #[must_use]
    pub const fn new(uid: TabUid, verbosity: u8) -> Self {
        Self { uid, verbosity }
    }

    /// Returns the tab identifier.
    #[inline]
    #[must_use]
    pub const fn uid(&self) -> TabUid {
        self.uid
    }

    /// Returns the configured verbosity.
    #[inline]
    #[must_use]
    pub const fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Returns `true` if messages at `min_level` are emitted.
    #[inline]
    #[must_use]
    pub const fn enabled(&self, min_level: u8) -> bool {
        self.verbosity >= min_level
    }

    /// Logs `message` if the verbosity reaches `min_level`.
    pub fn log(&self, min_level: u8, message: &str) {
        if !self.enabled(min_level) {
            return;
        }

        let message = escape_non_ascii(message);
        match min_level {
            0 | 1 => info!(target: "render", uid = %self.uid, "{message}"),
            2 => debug!(target: "render", uid = %self.uid, "{message}"),
            _ => trace!(target: "render", uid = %self.uid, "{message}"),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escapes non-ASCII characters as `\u{..}` so log lines stay ASCII.
#[must_use]
pub fn escape_non_ascii(message: &str) -> String {
    if message.is_ascii() {
        return message.to_string();
    }
    message
        .chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_string()
            } else {
                c.escape_unicode().to_string()
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
