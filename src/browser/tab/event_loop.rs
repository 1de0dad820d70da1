//! Signal dispatch.

use tracing::{debug, trace};

use crate::protocol::{Signal, SignalReceiver};

use super::Tab;

// ============================================================================
// Tab - Event Loop
// ============================================================================

impl Tab {
    /// Handles one signal to completion, including any callbacks it runs.
    pub fn dispatch(&mut self, signal: Signal) {
        trace!(uid = %self.uid(), signal = signal.name(), "Dispatching signal");

        match signal {
            Signal::LoadFinished { ok } => self.on_load_finished(ok),

            // Closing tabs only report ignored loads; the rest is dropped.
            _ if self.closing => {
                trace!(uid = %self.uid(), signal = signal.name(), "Tab closing, signal dropped");
            }

            Signal::UrlChanged { url } => self.on_url_changed(&url),
            Signal::TimerExpired(id) => self.on_timer_expired(id),
            Signal::FetchFinished(reply) => self.on_fetch_finished(reply),
            Signal::Close => self.close(),
        }
    }

    /// Drives the tab until it delivers an outcome, closes, or every
    /// [`SignalSender`](crate::protocol::SignalSender) is dropped.
    ///
    /// `signals` must be the receiver paired with the sender given to
    /// [`Tab::new`]. The tab is closed before this returns.
    pub async fn run(&mut self, signals: &mut SignalReceiver) {
        while !self.closing && !self.result_already_returned() {
            let Some(signal) = signals.recv().await else {
                debug!(uid = %self.uid(), "Signal channel closed");
                break;
            };
            self.dispatch(signal);
        }

        self.close();
        debug!(uid = %self.uid(), state = ?self.result.state(), "Event loop terminated");
    }
}
