//! Tab configuration.
//!
//! [`TabOptions`] is read once when a tab is created. Afterwards the tab
//! owns a mutable copy, and setters like
//! [`Tab::set_viewport`](crate::Tab::set_viewport) change it for every
//! later operation. Changes never apply to navigations or captures that
//! were already issued.
//!
//! # Example
//!
//! ```ignore
//! use render_tab::TabOptions;
//!
//! let options = TabOptions::new()
//!     .with_verbosity(2)
//!     .with_viewport(1280, 720)
//!     .with_default_header("Accept-Language", "en")
//!     .with_images(false);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::engine::{EngineSettings, Size};
use crate::error::{Error, Result};
use crate::identifiers::TabUid;

// ============================================================================
// Constants
// ============================================================================

/// Viewport used when none is configured, and when `"full"` can't be measured.
pub const VIEWPORT_FALLBACK: Size = Size::new(1024, 768);

/// Default render log verbosity.
pub const DEFAULT_VERBOSITY: u8 = 1;

static VIEWPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*x\s*(\d+)\s*$").expect("viewport pattern is valid"));

// ============================================================================
// Viewport
// ============================================================================

/// Requested viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    /// Size the viewport to the page contents.
    Full,
    /// Explicit size.
    Fixed(Size),
}

impl FromStr for Viewport {
    type Err = Error;

    /// Parses `"full"` or `"<width>x<height>"`.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("full") {
            return Ok(Self::Full);
        }

        let caps = VIEWPORT_RE
            .captures(s)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid viewport: {s:?}")))?;

        let parse = |idx: usize| -> Result<u32> {
            caps[idx]
                .parse()
                .map_err(|_| Error::invalid_argument(format!("Viewport dimension out of range: {s:?}")))
        };

        Ok(Self::Fixed(Size::new(parse(1)?, parse(2)?)))
    }
}

impl From<Size> for Viewport {
    fn from(size: Size) -> Self {
        Self::Fixed(size)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Fixed(size) => write!(f, "{}x{}", size.width, size.height),
        }
    }
}

// ============================================================================
// Headers
// ============================================================================

/// Ordered list of raw request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Creates an empty list.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a header.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns the first value for `name` (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw pairs.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

impl From<Vec<(String, String)>> for Headers {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(map: HashMap<String, String>) -> Self {
        let mut pairs: Vec<_> = map.into_iter().collect();
        pairs.sort();
        Self(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// TabOptions
// ============================================================================

/// Per-tab configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabOptions {
    /// Identifier stamped on log lines.
    pub uid: TabUid,

    /// Render log verbosity (0 = quiet, 4 = every engine signal).
    pub verbosity: u8,

    /// Initial viewport.
    pub viewport: Size,

    /// Headers attached to every main-frame request.
    pub default_headers: Headers,

    /// Engine settings applied at creation.
    pub settings: EngineSettings,
}

impl Default for TabOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl TabOptions {
    /// Creates options with a random uid and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            uid: TabUid::generate(),
            verbosity: DEFAULT_VERBOSITY,
            viewport: VIEWPORT_FALLBACK,
            default_headers: Headers::new(),
            settings: EngineSettings::default(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl TabOptions {
    /// Sets the tab identifier.
    #[inline]
    #[must_use]
    pub fn with_uid(mut self, uid: TabUid) -> Self {
        self.uid = uid;
        self
    }

    /// Sets the render log verbosity.
    #[inline]
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Sets the initial viewport in pixels.
    #[inline]
    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    /// Adds a default header.
    #[inline]
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push(name, value);
        self
    }

    /// Replaces all default headers.
    #[inline]
    #[must_use]
    pub fn with_default_headers(mut self, headers: impl Into<Headers>) -> Self {
        self.default_headers = headers.into();
        self
    }

    /// Enables or disables image loading.
    #[inline]
    #[must_use]
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.settings.auto_load_images = enabled;
        self
    }

    /// Replaces the engine settings.
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty viewport.
    pub fn validate(&self) -> Result<()> {
        if self.viewport.is_empty() {
            return Err(Error::invalid_argument(
                "Viewport dimensions must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
