//! Browser tab module.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tab`] | Per-tab navigation controller |
//! | [`TabOptions`] | Configuration read at tab creation |

// ============================================================================
// Submodules
// ============================================================================

/// Tab configuration.
pub mod options;

/// Tab navigation controller.
pub mod tab;

// ============================================================================
// Re-exports
// ============================================================================

pub use options::{DEFAULT_VERBOSITY, Headers, TabOptions, VIEWPORT_FALLBACK, Viewport};
pub use tab::{
    ErrorCallback, FrameDescription, LoadClassification, NavigationRequest, SCRIPT_EXTENSION,
    ScreenshotBuilder, Tab, TabCallback,
};
