//! # Application configuration: `proyecto301.toml`
//!
//! Defines the TOML document the launcher embeds at build time
//! (filename: [`AppConfig::filename`] = `"proyecto301.toml"`).
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! url = "https://xyz.example.co"
//! anon_key = "public-anon-key"
//!
//! [storage]
//! covers_bucket = "project-covers"
//! avatars_bucket = "avatars"
//!
//! [bootstrap]
//! poll_interval_ms = 100   # readiness poll period
//! max_attempts = 50        # polls before giving up
//!
//! [ui]
//! search_debounce_ms = 300
//! close_delay_ms = 1500
//! default_language = "es"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`AppConfig`] | Top-level config with TOML (de)serialisation and environment overrides. |
//! | [`BackendConfig`] | Service URL and public anon key. |
//! | [`StorageConfig`] | Bucket names for project covers and avatars. |
//! | [`BootstrapConfig`] | Readiness wait: poll interval and attempt ceiling. |
//! | [`UiConfig`] | Search debounce, wizard close delay, default language. |
//!
//! Every section has production defaults, so a missing or empty file is
//! equivalent to [`AppConfig::default`].

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `proyecto301.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the hosted backend lives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

impl BackendConfig {
    /// Both the URL and the key are set.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_covers_bucket")]
    pub covers_bucket: String,
    #[serde(default = "default_avatars_bucket")]
    pub avatars_bucket: String,
}

fn default_covers_bucket() -> String {
    "project-covers".to_string()
}

fn default_avatars_bucket() -> String {
    "avatars".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            covers_bucket: default_covers_bucket(),
            avatars_bucket: default_avatars_bucket(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_poll_interval() -> u32 {
    100
}

fn default_max_attempts() -> u32 {
    50
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u32,
    #[serde(default = "default_close_delay")]
    pub close_delay_ms: u32,
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_search_debounce() -> u32 {
    300
}

fn default_close_delay() -> u32 {
    1500
}

fn default_language() -> String {
    "es".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce(),
            close_delay_ms: default_close_delay(),
            default_language: default_language(),
        }
    }
}

impl AppConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "proyecto301.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Replace the backend section fields that are given and non-empty.
    pub fn with_backend_overrides(mut self, url: Option<&str>, anon_key: Option<&str>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.url = url.trim().to_string();
        }
        if let Some(key) = anon_key.filter(|k| !k.trim().is_empty()) {
            self.backend.anon_key = key.trim().to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.covers_bucket, "project-covers");
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert!(!config.backend.is_configured());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [backend]
            url = "https://demo.example.co"
            anon_key = "k"

            [ui]
            close_delay_ms = 500
            "#,
        )
        .unwrap();
        assert!(config.backend.is_configured());
        assert_eq!(config.ui.close_delay_ms, 500);
        assert_eq!(config.ui.default_language, "es");
        assert_eq!(config.bootstrap.max_attempts, 50);
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let config = AppConfig::default()
            .with_backend_overrides(Some("https://a.example.co"), Some("  "));
        assert_eq!(config.backend.url, "https://a.example.co");
        assert_eq!(config.backend.anon_key, "");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default().with_backend_overrides(Some("https://x.co"), Some("k"));
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }
}
