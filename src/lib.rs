//! Render Tab - per-tab navigation controller for a headless rendering engine.
//!
//! This library drives one engine-hosted page from navigation to a single
//! terminal outcome: rendered HTML, a PNG, a frame tree, a HAR log, or an
//! error.
//!
//! # Architecture
//!
//! A [`Tab`] is a single-consumer state machine:
//!
//! - **Engine (collaborator)**: loads, paints, runs scripts, reports progress
//!   as [`Signal`]s
//! - **Tab (this crate)**: classifies load results, runs timers and callbacks,
//!   records history, delivers one outcome
//!
//! Key design principles:
//!
//! - Every asynchronous input reaches the tab through one signal channel
//! - Callbacks get `&mut Tab`, so state is never touched concurrently
//! - Cancel-on-redirect timers are swept inside the URL-change handler
//! - The outcome channel accepts at most one delivery
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use render_tab::{HarRecorder, NavigationRequest, RedirectPolicy, RenderOutput, Tab, TabOptions};
//!
//! # async fn example(engine: impl render_tab::Engine + 'static) -> render_tab::Result<()> {
//! let (tx, mut rx) = render_tab::channel();
//! let (mut tab, result) = Tab::new(engine, HarRecorder::new(), &tx, TabOptions::new())?;
//!
//! tab.go(
//!     NavigationRequest::get("https://example.com"),
//!     |tab| {
//!         tab.wait(
//!             Duration::from_millis(500),
//!             |tab| {
//!                 let html = tab.html();
//!                 tab.return_result(RenderOutput::Html(html));
//!             },
//!             Some(RedirectPolicy::Cancel),
//!         );
//!     },
//!     |tab, error| {
//!         tab.return_error(error);
//!     },
//! )?;
//!
//! tab.run(&mut rx).await;
//! let output = result.recv().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | [`Tab`] and [`TabOptions`] |
//! | [`engine`] | Rendering engine collaborator traits |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`har`] | Timing markers and network log |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`logging`] | Verbosity-gated render log |
//! | [`protocol`] | Tab signals and channel |
//! | [`result`] | Single-assignment outcome channel |
//! | [`timers`] | One-shot timers with cancel-on-redirect |

// ============================================================================
// Modules
// ============================================================================

/// Tab and its configuration.
pub mod browser;

/// Rendering engine collaborator.
///
/// Implement [`Engine`] and [`Frame`] to plug a real engine in.
pub mod engine;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Timing markers and HAR log.
pub mod har;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Verbosity-gated render log.
pub mod logging;

/// Tab signal protocol.
///
/// Signals are the only inputs of the tab state machine.
pub mod protocol;

/// Single-assignment outcome delivery.
pub mod result;

/// One-shot timers with cancel-on-redirect.
pub mod timers;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{
    ErrorCallback, FrameDescription, Headers, LoadClassification, NavigationRequest,
    ScreenshotBuilder, Tab, TabCallback, TabOptions, Viewport,
};

// Engine types
pub use engine::{
    Engine, EngineSettings, ErrorInfo, FetchReply, Frame, Geometry, HttpMethod, JsConsole,
    PageRequest, Size,
};

// Error types
pub use error::{Error, Result};

// HAR types
pub use har::{HarEntry, HarLog, HarRecorder};

// Identifier types
pub use identifiers::{TabUid, TimerId};

// Protocol types
pub use protocol::{Signal, SignalReceiver, SignalSender, WeakSignalSender, channel};

// Result types
pub use result::{Delivery, DeliveryState, Outcome, RenderOutput, ResultChannel, ResultReceiver};

// Timer types
pub use timers::{RedirectPolicy, TimerHandle, TimerRegistry};
