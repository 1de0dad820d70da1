//! Tab signal protocol.
//!
//! The tab is a single-consumer state machine. Every asynchronous input
//! reaches it as a [`Signal`] over an unbounded channel and is handled to
//! completion before the next one is read.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `signal` | Signal enum and channel halves |

// ============================================================================
// Submodules
// ============================================================================

/// Signal enum and channel halves.
pub mod signal;

// ============================================================================
// Re-exports
// ============================================================================

pub use signal::{Signal, SignalReceiver, SignalSender, WeakSignalSender, channel};
