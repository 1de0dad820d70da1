//! Signals delivered to a tab's event loop.
//!
//! Signals are the only way asynchronous progress reaches a tab: the engine
//! reports loads, URL changes and fetch completions, timer tasks report
//! expiry, and the owner can request a close.
//!
//! # Signal Types
//!
//! | Signal | Source |
//! |--------|--------|
//! | `LoadFinished` | engine, end of a navigation attempt |
//! | `UrlChanged` | engine, main frame URL changed |
//! | `FetchFinished` | engine, raw fetch completed |
//! | `TimerExpired` | tab timer task |
//! | `Close` | owner |

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::engine::FetchReply;
use crate::identifiers::TimerId;

// ============================================================================
// Signal
// ============================================================================

/// A typed transition input for the tab state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A navigation attempt ended.
    LoadFinished {
        /// Engine-reported success flag, independent of the error slot.
        ok: bool,
    },

    /// The main frame URL changed.
    UrlChanged {
        /// New URL.
        url: String,
    },

    /// A timer scheduled with `wait` elapsed.
    TimerExpired(TimerId),

    /// A raw network fetch completed.
    FetchFinished(FetchReply),

    /// The owner asked the tab to shut down.
    Close,
}

impl Signal {
    /// Returns a short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadFinished { .. } => "loadFinished",
            Self::UrlChanged { .. } => "urlChanged",
            Self::TimerExpired(_) => "timerExpired",
            Self::FetchFinished(_) => "fetchFinished",
            Self::Close => "close",
        }
    }
}

// ============================================================================
// Channel
// ============================================================================

/// Creates a connected signal sender/receiver pair.
#[must_use]
pub fn channel() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalSender { tx }, SignalReceiver { rx })
}

/// Sending half, cloned freely by the engine and timer tasks.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<Signal>,
}

impl SignalSender {
    /// Queues a signal. Returns `false` if the tab is gone.
    pub fn send(&self, signal: Signal) -> bool {
        self.tx.send(signal).is_ok()
    }

    /// Queues `LoadFinished`.
    pub fn load_finished(&self, ok: bool) -> bool {
        self.send(Signal::LoadFinished { ok })
    }

    /// Queues `UrlChanged`.
    pub fn url_changed(&self, url: impl Into<String>) -> bool {
        self.send(Signal::UrlChanged { url: url.into() })
    }

    /// Queues `FetchFinished`.
    pub fn fetch_finished(&self, reply: FetchReply) -> bool {
        self.send(Signal::FetchFinished(reply))
    }

    /// Queues `Close`.
    pub fn close(&self) -> bool {
        self.send(Signal::Close)
    }

    /// Returns `true` if the receiving tab was dropped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Returns a handle that does not keep the channel open.
    #[must_use]
    pub fn downgrade(&self) -> WeakSignalSender {
        WeakSignalSender {
            tx: self.tx.downgrade(),
        }
    }
}

/// Sending half that does not count as a sender.
///
/// The tab holds one of these for its own timers, so
/// [`SignalReceiver::recv`] still ends once every [`SignalSender`] is gone.
#[derive(Debug, Clone)]
pub struct WeakSignalSender {
    tx: mpsc::WeakUnboundedSender<Signal>,
}

impl WeakSignalSender {
    /// Returns a strong sender, or `None` if every strong sender was dropped.
    #[must_use]
    pub fn upgrade(&self) -> Option<SignalSender> {
        self.tx.upgrade().map(|tx| SignalSender { tx })
    }

    /// Queues a signal if the channel is still open.
    pub fn send(&self, signal: Signal) -> bool {
        self.upgrade().is_some_and(|tx| tx.send(signal))
    }
}

/// Receiving half, owned by the tab event loop.
#[derive(Debug)]
pub struct SignalReceiver {
    rx: mpsc::UnboundedReceiver<Signal>,
}

impl SignalReceiver {
    /// Waits for the next signal. Returns `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<Signal> {
        self.rx.recv().await
    }

    /// Takes the next queued signal without waiting.
    pub fn try_recv(&mut self) -> Option<Signal> {
        match self.rx.try_recv() {
            Ok(signal) => Some(signal),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
