//! Document, HAR and history snapshots.

use serde_json::Value;

use crate::har::ON_HTML_RENDERED;

use super::Tab;

// ============================================================================
// Tab - Snapshots
// ============================================================================

impl Tab {
    /// Returns the serialized main frame document.
    pub fn html(&self) -> String {
        self.logger.log(2, "getting HTML");
        let html = self.engine.main_frame().to_html();
        self.har.store_timing(ON_HTML_RENDERED);
        html
    }

    /// Returns the accumulated HAR log.
    pub fn har(&self) -> Value {
        self.logger.log(3, "getting HAR");
        self.har.to_value()
    }

    /// Returns the main-request history, one entry per URL change.
    ///
    /// An entry is `None` when no HAR entry preceded the URL change. Query
    /// strings are left out of every request record.
    pub fn history(&self) -> Vec<Option<Value>> {
        self.logger.log(3, "getting history");
        self.history
            .iter()
            .map(|entry| entry.as_ref().map(without_query_string))
            .collect()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn without_query_string(entry: &Value) -> Value {
    let mut entry = entry.clone();
    if let Some(request) = entry.get_mut("request").and_then(Value::as_object_mut) {
        request.remove("queryString");
    }
    entry
}

// ============================================================================
// Tests
// ============================================================================
