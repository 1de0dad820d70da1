//! Request and reply types exchanged with the engine.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// HttpMethod
// ============================================================================

/// HTTP method for a main-frame load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET (default).
    #[default]
    Get,
    /// HEAD.
    Head,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::invalid_argument(format!(
                "Unsupported HTTP method: {other}"
            ))),
        }
    }
}

// ============================================================================
// PageRequest
// ============================================================================

/// A request descriptor handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Target URL.
    pub url: Url,
    /// Raw headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// `true` when the request is issued on behalf of the main frame.
    pub from_main_frame: bool,
}

impl PageRequest {
    /// Creates a request without headers.
    #[inline]
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
            from_main_frame: false,
        }
    }

    /// Returns the first header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// ============================================================================
// FetchReply
// ============================================================================

/// Result of a raw network fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReply {
    /// Response body, possibly empty.
    pub data: Vec<u8>,
    /// Declared `Content-Type`, if any.
    pub content_type: Option<String>,
    /// Error description when the fetch failed.
    pub error: Option<String>,
}

impl FetchReply {
    /// Creates a successful reply.
    #[must_use]
    pub fn ok(data: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: Some(content_type.into()),
            error: None,
        }
    }

    /// Creates a failed reply with an empty body.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Returns `true` if the fetch reported an error.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================================
// ErrorInfo
// ============================================================================

/// Page-level error the engine keeps after a failed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Error domain (e.g. "http", "network").
    pub domain: String,
    /// Engine-specific error code.
    pub code: i32,
    /// Human readable description.
    pub text: String,
    /// URL that produced the error.
    pub url: String,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error {}: {} ({})", self.domain, self.code, self.text, self.url)
    }
}

// ============================================================================
// Tests
// ============================================================================
