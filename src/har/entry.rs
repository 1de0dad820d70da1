//! HAR entry records.
//!
//! Field names follow the HAR 1.2 format. Fields whose key starts with `_`
//! are private bookkeeping and never leave the crate through history.

// ============================================================================
// Imports
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::engine::HttpMethod;

// ============================================================================
// Name/Value Pairs
// ============================================================================

/// A header or query string parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarPair {
    /// Name.
    pub name: String,
    /// Value.
    pub value: String,
}

impl HarPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// HarRequest
// ============================================================================

/// Request part of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRequest {
    /// Method name.
    pub method: String,
    /// Absolute URL.
    pub url: String,
    /// Protocol version.
    pub http_version: String,
    /// Cookies sent.
    #[serde(default)]
    pub cookies: Vec<Value>,
    /// Headers sent.
    #[serde(default)]
    pub headers: Vec<HarPair>,
    /// Decoded query parameters.
    #[serde(default)]
    pub query_string: Vec<HarPair>,
    /// Header bytes, -1 if unknown.
    pub headers_size: i64,
    /// Body bytes, -1 if unknown.
    pub body_size: i64,
}

impl HarRequest {
    /// Builds a request record, decoding the query string from `url`.
    #[must_use]
    pub fn new(method: HttpMethod, url: &Url) -> Self {
        let query_string = url
            .query_pairs()
            .map(|(name, value)| HarPair::new(name, value))
            .collect();

        Self {
            method: method.as_str().to_string(),
            url: url.to_string(),
            http_version: "HTTP/1.1".to_string(),
            cookies: Vec::new(),
            headers: Vec::new(),
            query_string,
            headers_size: -1,
            body_size: -1,
        }
    }

    /// Adds headers.
    #[must_use]
    pub fn with_headers(mut self, headers: &[(String, String)]) -> Self {
        self.headers = headers
            .iter()
            .map(|(name, value)| HarPair::new(name.as_str(), value.as_str()))
            .collect();
        self
    }
}

// ============================================================================
// HarResponse
// ============================================================================

/// Response body description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarContent {
    /// Body size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
}

/// Response part of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarResponse {
    /// Status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Protocol version.
    pub http_version: String,
    /// Cookies received.
    #[serde(default)]
    pub cookies: Vec<Value>,
    /// Headers received.
    #[serde(default)]
    pub headers: Vec<HarPair>,
    /// Body.
    pub content: HarContent,
    /// `Location` target, empty if none.
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    /// Header bytes, -1 if unknown.
    pub headers_size: i64,
    /// Body bytes, -1 if unknown.
    pub body_size: i64,
}

impl HarResponse {
    /// Builds a response record.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            http_version: "HTTP/1.1".to_string(),
            cookies: Vec::new(),
            headers: Vec::new(),
            content: HarContent {
                size: -1,
                mime_type: mime_type.into(),
            },
            redirect_url: String::new(),
            headers_size: -1,
            body_size: -1,
        }
    }

    /// Sets the redirect target.
    #[must_use]
    pub fn with_redirect(mut self, location: impl Into<String>) -> Self {
        self.redirect_url = location.into();
        self
    }
}

// ============================================================================
// HarTimings
// ============================================================================

/// Phase durations in milliseconds, -1 when not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarTimings {
    /// Queueing.
    pub blocked: f64,
    /// DNS resolution.
    pub dns: f64,
    /// TCP connect.
    pub connect: f64,
    /// Sending the request.
    pub send: f64,
    /// Waiting for the first byte.
    pub wait: f64,
    /// Reading the body.
    pub receive: f64,
    /// TLS handshake.
    pub ssl: f64,
}

impl Default for HarTimings {
    fn default() -> Self {
        Self {
            blocked: -1.0,
            dns: -1.0,
            connect: -1.0,
            send: 0.0,
            wait: 0.0,
            receive: 0.0,
            ssl: -1.0,
        }
    }
}

// ============================================================================
// HarEntry
// ============================================================================

/// One request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarEntry {
    /// When the request started.
    pub started_date_time: DateTime<Utc>,
    /// Total time in milliseconds.
    pub time: f64,
    /// Page this entry belongs to.
    pub pageref: String,
    /// Request record.
    pub request: HarRequest,
    /// Response record.
    pub response: HarResponse,
    /// Cache info (unused, kept for format compliance).
    #[serde(default)]
    pub cache: Map<String, Value>,
    /// Phase timings.
    pub timings: HarTimings,
    /// Private fields (`_`-prefixed keys).
    #[serde(flatten)]
    pub private: Map<String, Value>,
}

impl HarEntry {
    /// Creates an entry for page `"1"` starting now.
    #[must_use]
    pub fn new(request: HarRequest, response: HarResponse) -> Self {
        Self {
            started_date_time: Utc::now(),
            time: 0.0,
            pageref: "1".to_string(),
            request,
            response,
            cache: Map::new(),
            timings: HarTimings::default(),
            private: Map::new(),
        }
    }

    /// Attaches a private field. The key gets a `_` prefix if it lacks one.
    #[must_use]
    pub fn with_private(mut self, key: &str, value: Value) -> Self {
        let key = if key.starts_with('_') {
            key.to_string()
        } else {
            format!("_{key}")
        };
        self.private.insert(key, value);
        self
    }

    /// Returns `true` if the request URL is `url`.
    ///
    /// URLs are compared in normalized form when both parse.
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        match (Url::parse(&self.request.url), Url::parse(url)) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => self.request.url == url,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Returns a copy of `value` without top-level `_`-prefixed keys.
#[must_use]
pub fn without_private(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !key.starts_with('_'))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn entry(url: &str) -> HarEntry {
        let url = Url::parse(url).unwrap();
        HarEntry::new(
            HarRequest::new(HttpMethod::Get, &url),
            HarResponse::new(200, "OK", "text/html"),
        )
    }

    #[test]
    fn test_query_string_is_decoded() {
        let e = entry("http://example.com/search?q=rust+lang&page=2");
        assert_eq!(
            e.request.query_string,
            vec![HarPair::new("q", "rust lang"), HarPair::new("page", "2")]
        );
    }

    #[test]
    fn test_private_fields_flatten() {
        let e = entry("http://example.com/").with_private("state", json!("finished"));
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["_state"], json!("finished"));
        assert_eq!(value["response"]["redirectURL"], json!(""));
    }

    #[test]
    fn test_without_private_strips_top_level_only() {
        let value = json!({
            "_tmp": 1,
            "request": {"_inner": 2, "url": "x"},
            "time": 3
        });
        let stripped = without_private(&value);
        assert_eq!(
            stripped,
            json!({"request": {"_inner": 2, "url": "x"}, "time": 3})
        );
    }

    #[test]
    fn test_matches_url_normalizes() {
        let e = entry("http://example.com");
        assert!(e.matches_url("http://example.com/"));
        assert!(!e.matches_url("http://example.org/"));
    }
}
