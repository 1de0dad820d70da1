//! JavaScript execution, injection and console capture.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::engine::JsConsole;
use crate::error::{Error, Result};

use super::Tab;

/// Extension of files picked up by [`Tab::inject_directory`].
pub const SCRIPT_EXTENSION: &str = "js";

/// Name the console bridge is exposed under.
const CONSOLE_OBJECT: &str = "console";

// ============================================================================
// Tab - Script Execution
// ============================================================================

impl Tab {
    /// Runs `source` in the main frame and returns its result as text.
    ///
    /// Strings come back unchanged, booleans and numbers as their literal
    /// text. `null`, arrays and objects have no text form and yield an empty
    /// string.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = tab.run_script("document.title");
    /// ```
    pub fn run_script(&mut self, source: &str) -> String {
        debug!(uid = %self.uid(), script_len = source.len(), "Running script");
        let value = self.engine.evaluate_script(source);
        coerce_to_text(&value)
    }

    /// Reads a UTF-8 script from `path` and runs it.
    ///
    /// Injected code does not survive later navigations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceRead`] if the file can't be read.
    pub fn inject_file(&mut self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::resource_read(path, e))?;
        self.logger
            .log(2, &format!("injecting {}", path.display()));
        Ok(self.run_script(&source))
    }

    /// Injects every `.js` file in `dir`, in directory listing order.
    ///
    /// Returns the number of files injected. Files injected before a read
    /// failure stay injected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceRead`] if the directory or a script can't be
    /// read.
    pub fn inject_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| Error::resource_read(dir, e))?;

        let mut injected = 0;
        for entry in entries {
            let path = entry.map_err(|e| Error::resource_read(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION) {
                self.inject_file(&path)?;
                injected += 1;
            }
        }

        debug!(uid = %self.uid(), dir = %dir.display(), injected, "Scripts injected");
        Ok(injected)
    }
}

// ============================================================================
// Tab - Console
// ============================================================================

impl Tab {
    /// Exposes a `console` object with a `log(message)` method to scripts.
    ///
    /// Calling it again keeps the existing console and its messages.
    pub fn enable_console(&mut self) {
        if self.console.is_some() {
            return;
        }
        let console = JsConsole::new();
        self.engine.expose_console(CONSOLE_OBJECT, console.clone());
        self.console = Some(console);
        self.logger.log(2, "javascript console enabled");
    }

    /// Returns the messages logged so far, oldest first.
    ///
    /// Empty while the console is disabled.
    #[must_use]
    pub fn console_messages(&self) -> Vec<String> {
        self.console
            .as_ref()
            .map(JsConsole::messages)
            .unwrap_or_default()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_coerce_to_text() {
        assert_eq!(coerce_to_text(&json!("hello")), "hello");
        assert_eq!(coerce_to_text(&json!(true)), "true");
        assert_eq!(coerce_to_text(&json!(42)), "42");
        assert_eq!(coerce_to_text(&json!(1.5)), "1.5");
        assert_eq!(coerce_to_text(&Value::Null), "");
        assert_eq!(coerce_to_text(&json!([1, 2])), "");
        assert_eq!(coerce_to_text(&json!({"a": 1})), "");
    }
}
