//! Rendering engine collaborator.
//!
//! The tab never paints, parses or fetches by itself. It drives an
//! [`Engine`] implementation, which reports asynchronous progress back
//! through a [`SignalSender`](crate::protocol::SignalSender).
//!
//! # Contract
//!
//! | Call | Completion |
//! |------|------------|
//! | [`Engine::load`] | `Signal::LoadFinished { ok }` (possibly more than once) |
//! | [`Engine::set_content`] | `Signal::LoadFinished { ok }` |
//! | [`Engine::fetch`] | `Signal::FetchFinished(reply)` |
//! | main frame URL change | `Signal::UrlChanged { url }` |
//!
//! Everything else is synchronous.

// ============================================================================
// Submodules
// ============================================================================

mod console;
mod request;
mod settings;

// ============================================================================
// Re-exports
// ============================================================================

pub use console::JsConsole;
pub use request::{ErrorInfo, FetchReply, HttpMethod, PageRequest};
pub use settings::EngineSettings;

// ============================================================================
// Imports
// ============================================================================

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

// ============================================================================
// Geometry
// ============================================================================

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Size {
    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either side is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Position and size of a frame inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Left offset.
    pub x: i32,
    /// Top offset.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

// Serialized as `[x, y, width, height]`.
impl Serialize for Geometry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.x, self.y, self.width, self.height).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (x, y, width, height) = <(i32, i32, u32, u32)>::deserialize(deserializer)?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

// ============================================================================
// Frame
// ============================================================================

/// A document context within a page.
pub trait Frame {
    /// Current URL.
    fn url(&self) -> String;

    /// URL originally requested for this frame.
    fn requested_url(&self) -> String;

    /// Frame position and size.
    fn geometry(&self) -> Geometry;

    /// Document title.
    fn title(&self) -> String;

    /// Frame name attribute.
    fn name(&self) -> String;

    /// Serialized document.
    fn to_html(&self) -> String;

    /// Direct child frames in document order.
    fn child_frames(&self) -> Vec<&dyn Frame>;
}

// ============================================================================
// Engine
// ============================================================================

/// One engine-hosted page.
///
/// Implementations must be `Send` so a tab can run on any runtime worker.
/// Asynchronous completions are reported as signals, never by calling
/// back into the tab.
pub trait Engine: Send {
    /// Issues a main-frame load.
    fn load(&mut self, request: PageRequest, method: HttpMethod, body: Option<Vec<u8>>);

    /// Issues a raw network fetch outside the page.
    fn fetch(&mut self, request: PageRequest);

    /// Replaces the main document with `data`, resolving relative URLs against `base_url`.
    fn set_content(&mut self, data: Vec<u8>, mime_type: &str, base_url: Url);

    /// Returns the page-level error from the last load, if any.
    fn error_info(&self) -> Option<ErrorInfo>;

    /// Cancels pending meta-refresh and scheduled redirects.
    fn stop_scheduled_refresh(&mut self);

    /// Stops loading the current page.
    fn stop(&mut self);

    /// Releases the page.
    fn close(&mut self);

    /// Returns the top-level frame.
    fn main_frame(&self) -> &dyn Frame;

    /// Returns the current viewport size.
    fn viewport_size(&self) -> Size;

    /// Resizes the viewport.
    fn set_viewport_size(&mut self, size: Size);

    /// Returns the full size of the main frame contents.
    fn contents_size(&self) -> Size;

    /// Paints the current viewport.
    fn render_viewport(&mut self) -> RgbaImage;

    /// Evaluates a script in the main frame and returns its result.
    fn evaluate_script(&mut self, source: &str) -> Value;

    /// Exposes a console object to page scripts under `name`.
    fn expose_console(&mut self, name: &str, console: JsConsole);

    /// Applies page-wide settings.
    fn apply_settings(&mut self, settings: &EngineSettings);

    /// Overrides the `User-Agent` the page reports.
    fn set_custom_user_agent(&mut self, user_agent: &str);
}

// ============================================================================
// Tests
// ============================================================================
