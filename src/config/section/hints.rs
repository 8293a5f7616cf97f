//! `[hints]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [hints]
//! preconnect = "example.com, https://fonts.gstatic.com"
//! preload = "https://example.com/fonts/inter.woff2, https://example.com/hero.webp"
//! crossorigin = ["https://fonts.gstatic.com", "https://cdn.example.com"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::util::split_list;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Origin that always needs `crossorigin` on its preconnect hint.
pub const FONT_CDN_ORIGIN: &str = "https://fonts.gstatic.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HintsConfig {
    /// Comma-separated domains or URLs to preconnect to.
    pub preconnect: String,
    /// Further preconnect entries appended by the host.
    pub extra_preconnect: Vec<String>,
    /// Origins whose preconnect hint carries `crossorigin`.
    pub crossorigin: Vec<String>,
    /// Comma-separated absolute URLs to preload.
    pub preload: String,
    /// Comma-separated preloads attached to the current piece of content.
    pub page_preload: String,
    /// Further preload URLs appended by the host.
    pub extra_preload: Vec<String>,
    /// Preload markup goes right before the first occurrence of this.
    pub anchor: String,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            preconnect: String::new(),
            extra_preconnect: Vec::new(),
            crossorigin: vec![FONT_CDN_ORIGIN.to_string()],
            preload: String::new(),
            page_preload: String::new(),
            extra_preload: Vec::new(),
            anchor: "<link".into(),
        }
    }
}

impl HintsConfig {
    /// Configured preconnect entries followed by host-supplied ones.
    pub fn preconnect_entries(&self) -> Vec<String> {
        let mut entries = split_list(&self.preconnect);
        entries.extend(self.extra_preconnect.iter().map(|e| e.trim().to_string()));
        entries.retain(|e| !e.is_empty());
        entries
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.anchor.is_empty() {
            diag.error_with_hint(
                FieldPath::new("hints.anchor"),
                "injection anchor must not be empty",
                "the default is \"<link\"",
            );
        }
        for entry in split_list(&self.preload) {
            if url::Url::parse(&entry).is_err() {
                diag.warn(
                    FieldPath::new("hints.preload"),
                    format!("`{entry}` is not an absolute URL and will be skipped"),
                );
            }
        }
    }
}
