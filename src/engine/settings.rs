//! Engine settings surface.

use serde::{Deserialize, Serialize};

// ============================================================================
// EngineSettings
// ============================================================================

/// Page-wide engine attributes.
///
/// Defaults match the setup every tab starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Run page JavaScript.
    pub javascript_enabled: bool,
    /// Load browser plugins.
    pub plugins_enabled: bool,
    /// Keep no persistent state between pages.
    pub private_browsing_enabled: bool,
    /// Expose `window.localStorage`.
    pub local_storage_enabled: bool,
    /// Let `file://` content fetch remote URLs.
    pub local_content_can_access_remote_urls: bool,
    /// Fetch and paint images.
    pub auto_load_images: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            plugins_enabled: false,
            private_browsing_enabled: true,
            local_storage_enabled: true,
            local_content_can_access_remote_urls: true,
            auto_load_images: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert!(settings.javascript_enabled);
        assert!(!settings.plugins_enabled);
        assert!(settings.private_browsing_enabled);
        assert!(settings.local_storage_enabled);
        assert!(settings.auto_load_images);
    }
}
