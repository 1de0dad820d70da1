//! Per-tab navigation controller.
//!
//! Each [`Tab`] drives one engine page through a single event loop. The
//! owner issues operations on the tab and receives exactly one outcome
//! through the [`ResultReceiver`](crate::ResultReceiver).
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Tab struct, accessors, settings, result delivery |
//! | `event_loop` | Signal dispatch and the run loop |
//! | `navigation` | `go`, load-finished classification, close |
//! | `timers` | `wait`, URL-change history and redirect sweep |
//! | `screenshot` | Viewport PNG capture |
//! | `frames` | Frame tree description |
//! | `snapshot` | HTML, HAR and history snapshots |
//! | `script` | Script execution, injection, console capture |
//!
//! # Example
//!
//! ```ignore
//! let (tx, mut rx) = render_tab::channel();
//! let (mut tab, result) = Tab::new(engine, HarRecorder::new(), &tx, TabOptions::new())?;
//!
//! tab.go(
//!     NavigationRequest::get("https://example.com"),
//!     |tab| {
//!         tab.wait(Duration::from_millis(500), |tab| {
//!             let html = tab.html();
//!             tab.return_result(RenderOutput::Html(html));
//!         }, Some(RedirectPolicy::Cancel));
//!     },
//!     |tab, error| { tab.return_error(error); },
//! )?;
//!
//! tab.run(&mut rx).await;
//! let html = result.recv().await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod event_loop;
mod frames;
mod navigation;
mod screenshot;
mod script;
mod snapshot;
mod timers;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::{ErrorCallback, Tab, TabCallback};
pub use frames::FrameDescription;
pub use navigation::{LoadClassification, NavigationRequest};
pub use screenshot::ScreenshotBuilder;
pub use script::SCRIPT_EXTENSION;
