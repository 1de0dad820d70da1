//! Error types for the tab controller.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! Synchronous operations return [`Result<T>`] which uses [`Error`].
//! Navigation outcomes arrive through the tab's result channel instead:
//!
//! ```ignore
//! use render_tab::{Error, Result};
//!
//! fn example(tab: &mut Tab) -> Result<usize> {
//!     let injected = tab.inject_directory("./scripts")?;
//!     tab.inject_file("./extra/polyfill.js")?;
//!     Ok(injected + 1)
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Navigation | [`Error::NotSupported`], [`Error::LoadFailed`] |
//! | Arguments | [`Error::InvalidArgument`] |
//! | Resources | [`Error::ResourceRead`] |
//! | Lifecycle | [`Error::Closed`], [`Error::ChannelClosed`] |
//! | External | [`Error::Image`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use image::ImageError;
use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// Operation is not supported with the given arguments.
    ///
    /// Returned before any I/O, e.g. a non-GET navigation with a base URL.
    #[error("Not supported: {operation}")]
    NotSupported {
        /// Description of the rejected operation.
        operation: String,
    },

    /// The engine reported a page-level error when the load finished.
    #[error("Failed to load {url}: {reason}")]
    LoadFailed {
        /// URL of the navigation that failed.
        url: String,
        /// Error reported by the engine.
        reason: String,
    },

    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// Invalid argument.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A script file or directory could not be read.
    ///
    /// Scripts executed before the failure stay executed.
    #[error("Failed to read {path}: {source}")]
    ResourceRead {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: IoError,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The tab was closed before it produced an outcome.
    #[error("Tab closed")]
    Closed,

    /// The tab was dropped without delivering an outcome.
    #[error("Result channel closed")]
    ChannelClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// Image encoding error.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a not supported error.
    #[inline]
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Creates a load failure error.
    #[inline]
    pub fn load_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a resource read error.
    #[inline]
    pub fn resource_read(path: impl Into<PathBuf>, source: IoError) -> Self {
        Self::ResourceRead {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error was delivered as a navigation outcome.
    #[inline]
    #[must_use]
    pub fn is_navigation_error(&self) -> bool {
        matches!(self, Self::NotSupported { .. } | Self::LoadFailed { .. })
    }

    /// Returns `true` if this is a resource read error.
    #[inline]
    #[must_use]
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Self::ResourceRead { .. })
    }

    /// Returns `true` if the tab or its channel is gone.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed | Self::ChannelClosed)
    }
}

// ============================================================================
// Tests
// ============================================================================
