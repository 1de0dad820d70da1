//! Single-assignment outcome delivery.
//!
//! A tab reports exactly one terminal outcome to its owner. The channel is
//! a tokio `oneshot`; [`ResultChannel`] tracks whether delivery was already
//! attempted and warns about repeated attempts, but still hands them to the
//! underlying primitive, which is the final authority on acceptance.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::identifiers::TabUid;

// ============================================================================
// Types
// ============================================================================

/// What a render produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// Serialized document.
    Html(String),
    /// PNG bytes (or base64 text as bytes).
    Png(Vec<u8>),
    /// Structured result (HAR, frame tree, history...).
    Json(Value),
    /// Plain text.
    Text(String),
    /// Completed without a payload.
    Empty,
}

/// Terminal outcome of a tab.
pub type Outcome = Result<RenderOutput>;

/// Fulfillment state of a [`ResultChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryState {
    /// Nothing delivered yet.
    #[default]
    Empty,
    /// A success outcome was delivered.
    Success,
    /// An error outcome was delivered.
    Error,
}

/// Whether the primitive accepted a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The receiver got the outcome.
    Accepted,
    /// The primitive refused: already used or receiver dropped.
    Rejected,
}

// ============================================================================
// ResultChannel
// ============================================================================

/// Sending side owned by the tab.
#[derive(Debug)]
pub struct ResultChannel {
    uid: TabUid,
    tx: Option<oneshot::Sender<Outcome>>,
    state: DeliveryState,
}

impl ResultChannel {
    /// Creates a connected channel pair.
    #[must_use]
    pub fn new(uid: TabUid) -> (Self, ResultReceiver) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                uid,
                tx: Some(tx),
                state: DeliveryState::Empty,
            },
            ResultReceiver { rx },
        )
    }

    /// Delivers a success outcome.
    pub fn return_result(&mut self, output: RenderOutput) -> Delivery {
        self.deliver(Ok(output))
    }

    /// Delivers an error outcome.
    pub fn return_error(&mut self, error: Error) -> Delivery {
        self.deliver(Err(error))
    }

    /// Returns `true` once any delivery was attempted.
    #[inline]
    #[must_use]
    pub fn already_delivered(&self) -> bool {
        self.state != DeliveryState::Empty
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> DeliveryState {
        self.state
    }

    fn deliver(&mut self, outcome: Outcome) -> Delivery {
        if self.already_delivered() {
            warn!(uid = %self.uid, "error: result is already returned");
        } else {
            self.state = if outcome.is_ok() {
                DeliveryState::Success
            } else {
                DeliveryState::Error
            };
        }

        let Some(tx) = self.tx.take() else {
            debug!(uid = %self.uid, "Result channel refused a second delivery");
            return Delivery::Rejected;
        };

        match tx.send(outcome) {
            Ok(()) => Delivery::Accepted,
            Err(_) => {
                debug!(uid = %self.uid, "Result receiver dropped before delivery");
                Delivery::Rejected
            }
        }
    }
}

// ============================================================================
// ResultReceiver
// ============================================================================

/// Receiving side held by the tab's owner.
///
/// Owners needing an overall deadline wrap [`ResultReceiver::recv`] in
/// `tokio::time::timeout`; the tab itself never times out a navigation.
#[derive(Debug)]
pub struct ResultReceiver {
    rx: oneshot::Receiver<Outcome>,
}

impl ResultReceiver {
    /// Waits for the outcome.
    ///
    /// # Errors
    ///
    /// The delivered error, or [`Error::ChannelClosed`] if the tab was
    /// dropped without delivering.
    pub async fn recv(self) -> Outcome {
        self.rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Takes the outcome if it is already there.
    ///
    /// Returns `None` while nothing has been delivered, and
    /// [`Error::ChannelClosed`] once the tab was dropped without delivering.
    pub fn try_recv(&mut self) -> Option<Outcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(Error::ChannelClosed)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
