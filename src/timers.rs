//! One-shot timers with cancel-on-redirect.
//!
//! Each timer is a tokio task that sleeps and then queues
//! [`Signal::TimerExpired`]. Tasks hold a [`WeakSignalSender`], so a pending
//! timer never keeps the tab's channel open. The registry owns the callbacks, so a cancelled
//! timer can never run its callback even if its expiry signal was already
//! queued: the dispatcher finds no entry and drops the signal.
//!
//! # Invariant
//!
//! Every ID in the redirect-cancel map is also in the active map. Both
//! removal paths (expiry and cancel) remove from both maps.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::identifiers::TimerId;
use crate::protocol::{Signal, WeakSignalSender};

// ============================================================================
// RedirectPolicy
// ============================================================================

/// What to do with a timer when the main frame URL changes.
pub enum RedirectPolicy<C> {
    /// Drop the timer; its callback never runs.
    Cancel,
    /// Drop the timer and run this callback instead.
    Callback(C),
}

impl<C> RedirectPolicy<C> {
    /// Returns the replacement callback, if any.
    #[must_use]
    pub fn into_callback(self) -> Option<C> {
        match self {
            Self::Cancel => None,
            Self::Callback(callback) => Some(callback),
        }
    }
}

impl<C> fmt::Debug for RedirectPolicy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancel => f.write_str("Cancel"),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// ============================================================================
// TimerHandle
// ============================================================================

/// Public view of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    /// Timer ID.
    pub id: TimerId,
    /// Configured delay.
    pub delay: Duration,
    /// When the timer fires.
    pub deadline: Instant,
}

impl TimerHandle {
    /// Returns the time left before expiry.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

struct ActiveTimer<C> {
    handle: TimerHandle,
    callback: C,
    task: JoinHandle<()>,
}

// ============================================================================
// TimerRegistry
// ============================================================================

/// Active timers and their redirect-cancel associations.
pub struct TimerRegistry<C> {
    active: FxHashMap<TimerId, ActiveTimer<C>>,
    cancel_on_redirect: FxHashMap<TimerId, RedirectPolicy<C>>,
}

impl<C> Default for TimerRegistry<C> {
    fn default() -> Self {
        Self {
            active: FxHashMap::default(),
            cancel_on_redirect: FxHashMap::default(),
        }
    }
}

impl<C> fmt::Debug for TimerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("active", &self.active.len())
            .field("cancel_on_redirect", &self.cancel_on_redirect.len())
            .finish()
    }
}

impl<C> TimerRegistry<C> {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to run after `delay`.
    ///
    /// Must be called from within a tokio runtime. The expiry is lost if
    /// every strong sender is gone by the time the timer fires.
    pub fn schedule(
        &mut self,
        delay: Duration,
        callback: C,
        on_redirect: Option<RedirectPolicy<C>>,
        signals: &WeakSignalSender,
    ) -> TimerHandle {
        let handle = TimerHandle {
            id: TimerId::next(),
            delay,
            deadline: Instant::now() + delay,
        };

        let id = handle.id;
        let tx = signals.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            if !tx.send(Signal::TimerExpired(id)) {
                trace!(timer = %id, "Timer expired after signal channel closed");
            }
        });

        self.active.insert(
            id,
            ActiveTimer {
                handle,
                callback,
                task,
            },
        );
        if let Some(policy) = on_redirect {
            self.cancel_on_redirect.insert(id, policy);
        }

        trace!(timer = %id, delay_ms = delay.as_millis() as u64, "Timer scheduled");
        debug_assert!(self.invariant_holds());
        handle
    }

    /// Removes a timer that fired and returns its callback.
    ///
    /// Returns `None` for timers that were already cancelled.
    pub fn expire(&mut self, id: TimerId) -> Option<C> {
        let timer = self.active.remove(&id)?;
        self.cancel_on_redirect.remove(&id);
        debug_assert!(self.invariant_holds());
        Some(timer.callback)
    }

    /// Returns the IDs registered for cancel-on-redirect, oldest first.
    ///
    /// Callers iterate this snapshot, so timers scheduled while sweeping
    /// are not part of the current sweep.
    #[must_use]
    pub fn redirect_snapshot(&self) -> Vec<TimerId> {
        let mut ids: Vec<TimerId> = self.cancel_on_redirect.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Stops a timer and drops its callback.
    ///
    /// Returns the timer's redirect policy ([`RedirectPolicy::Cancel`] if it
    /// had none), or `None` if the timer is not active.
    pub fn cancel(&mut self, id: TimerId) -> Option<RedirectPolicy<C>> {
        let policy = self.cancel_on_redirect.remove(&id);
        let timer = self.active.remove(&id)?;
        timer.task.abort();
        debug_assert!(self.invariant_holds());
        Some(policy.unwrap_or(RedirectPolicy::Cancel))
    }

    /// Stops every timer. Used when the tab closes.
    pub fn cancel_all(&mut self) -> usize {
        self.cancel_on_redirect.clear();
        let count = self.active.len();
        for (_, timer) in self.active.drain() {
            timer.task.abort();
        }
        count
    }

    /// Returns the handle of an active timer.
    #[must_use]
    pub fn get(&self, id: TimerId) -> Option<TimerHandle> {
        self.active.get(&id).map(|timer| timer.handle)
    }

    /// Returns `true` if the timer has neither fired nor been cancelled.
    #[inline]
    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.active.contains_key(&id)
    }

    /// Returns `true` if the timer is cancelled on redirect.
    #[inline]
    #[must_use]
    pub fn cancels_on_redirect(&self, id: TimerId) -> bool {
        self.cancel_on_redirect.contains_key(&id)
    }

    /// Number of active timers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` if no timer is active.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn invariant_holds(&self) -> bool {
        self.cancel_on_redirect
            .keys()
            .all(|id| self.active.contains_key(id))
    }
}

// ============================================================================
// Tests
// ============================================================================
