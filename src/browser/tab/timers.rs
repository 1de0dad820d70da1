//! Delayed callbacks and URL-change handling.

use std::time::Duration;

use tracing::{trace, warn};

use crate::har::without_private;
use crate::identifiers::TimerId;
use crate::timers::{RedirectPolicy, TimerHandle};

use super::{Tab, TabCallback};

// ============================================================================
// RedirectPolicy - Tab Constructors
// ============================================================================

impl RedirectPolicy<TabCallback> {
    /// Cancels the timer on redirect and runs `callback` instead.
    #[must_use]
    pub fn call<F>(callback: F) -> Self
    where
        F: FnOnce(&mut Tab) + Send + 'static,
    {
        Self::Callback(Box::new(callback))
    }
}

// ============================================================================
// Tab - Timers
// ============================================================================

impl Tab {
    /// Runs `callback` after `delay`.
    ///
    /// With `on_redirect`, a main frame URL change before expiry cancels the
    /// timer: [`RedirectPolicy::Cancel`] just drops it,
    /// [`RedirectPolicy::Callback`] runs the given callback instead.
    ///
    /// # Example
    ///
    /// ```ignore
    /// tab.wait(
    ///     Duration::from_millis(500),
    ///     |tab| { let html = tab.html(); tab.return_result(RenderOutput::Html(html)); },
    ///     Some(RedirectPolicy::call(|tab| tab.return_error(Error::Closed))),
    /// );
    /// ```
    pub fn wait<F>(
        &mut self,
        delay: Duration,
        callback: F,
        on_redirect: Option<RedirectPolicy<TabCallback>>,
    ) -> TimerHandle
    where
        F: FnOnce(&mut Tab) + Send + 'static,
    {
        let handle = self
            .timers
            .schedule(delay, Box::new(callback), on_redirect, &self.signals);

        self.logger.log(
            2,
            &format!("waiting {}ms; timer {}", delay.as_millis(), handle.id),
        );
        handle
    }

    /// Handles expiry of a timer task.
    pub(super) fn on_timer_expired(&mut self, id: TimerId) {
        // Cancelled timers may still have an expiry queued.
        let Some(callback) = self.timers.expire(id) else {
            trace!(uid = %self.uid(), timer = %id, "Ignoring expiry of inactive timer");
            return;
        };

        self.logger.log(2, &format!("wait timeout for {id}"));
        callback(self);
    }

    /// Handles a main frame URL change.
    ///
    /// Appends a history entry, then cancels every cancel-on-redirect timer
    /// before returning, so none of them can fire after the redirect.
    pub(super) fn on_url_changed(&mut self, url: &str) {
        if self.logger.enabled(3) {
            self.logger.log(3, &format!("mainFrame().urlChanged {url}"));
        }

        self.record_history(url);

        for id in self.timers.redirect_snapshot() {
            let Some(policy) = self.timers.cancel(id) else {
                continue;
            };
            self.logger.log(2, &format!("cancelling timer {id}"));
            if let Some(callback) = policy.into_callback() {
                callback(self);
            }
        }
    }

    fn record_history(&mut self, url: &str) {
        let entry = self.har.prev_entry(url).and_then(|cause| {
            match serde_json::to_value(&cause) {
                Ok(value) => Some(without_private(&value)),
                Err(e) => {
                    warn!(uid = %self.uid(), error = %e, "Failed to serialize history entry");
                    None
                }
            }
        });
        self.history.push(entry);
    }
}
