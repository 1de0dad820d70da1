//! Script-visible console bridge.

use std::sync::Arc;

use parking_lot::Mutex;

// ============================================================================
// JsConsole
// ============================================================================

/// Append-only message sink exposed to page scripts as `console.log`.
///
/// Clones share the same buffer, so the engine can hold one end while the
/// tab reads the other.
#[derive(Debug, Clone, Default)]
pub struct JsConsole {
    messages: Arc<Mutex<Vec<String>>>,
}

impl JsConsole {
    /// Creates an empty console.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Called by the engine when a script logs.
    pub fn log(&self, message: impl Into<String>) {
        self.messages.lock().push(message.into());
    }

    /// Returns a snapshot of all messages so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns `true` if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}
