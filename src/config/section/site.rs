//! `[site]` section configuration.
//!
//! Locates the site and its sub-directories so that path patterns can be
//! prefixed correctly when the site does not live at the origin root.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com/blog/"
//! uploads = "https://cdn-origin.example.com/blog/media"
//! template = "https://example.com/blog/wp-content/themes/parent"
//! stylesheet = "https://example.com/blog/wp-content/themes/child"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::util::{is_http_url, join_path, origin_root};
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{ReferenceKind, UrlPatternPrefixer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin root all prefixes are relative to (default: origin of `url`).
    pub root: Option<String>,
    /// Site URL, where login and admin live.
    pub url: Option<String>,
    /// Public front page URL (default: `url`).
    pub home: Option<String>,
    /// Uploads directory URL (default: `{content}/uploads`).
    pub uploads: Option<String>,
    /// Content directory URL (default: `{url}/wp-content`).
    pub content: Option<String>,
    /// Plugins directory URL (default: `{content}/plugins`).
    pub plugins: Option<String>,
    /// Active parent theme directory URL (default: `{content}/themes`).
    pub template: Option<String>,
    /// Active child theme directory URL (default: `template`).
    pub stylesheet: Option<String>,
}

impl SiteConfig {
    const FIELDS: [(ReferenceKind, FieldPath); 7] = [
        (ReferenceKind::Site, FieldPath::new("site.url")),
        (ReferenceKind::Home, FieldPath::new("site.home")),
        (ReferenceKind::Uploads, FieldPath::new("site.uploads")),
        (ReferenceKind::Content, FieldPath::new("site.content")),
        (ReferenceKind::Plugins, FieldPath::new("site.plugins")),
        (ReferenceKind::Template, FieldPath::new("site.template")),
        (ReferenceKind::Stylesheet, FieldPath::new("site.stylesheet")),
    ];

    /// Site URL, or `/` when the site is configured by path only.
    pub fn site_url(&self) -> &str {
        self.url.as_deref().unwrap_or("/")
    }

    /// Origin root used as the base of every prefix.
    pub fn root_url(&self) -> String {
        self.root
            .clone()
            .or_else(|| self.url.as_deref().and_then(origin_root))
            .unwrap_or_else(|| "/".to_string())
    }

    /// Base URL of a reference kind, with defaults filled in.
    pub fn base_url(&self, kind: ReferenceKind) -> String {
        let content = || {
            self.content
                .clone()
                .unwrap_or_else(|| join_path(self.site_url(), "wp-content"))
        };
        let template = || {
            self.template
                .clone()
                .unwrap_or_else(|| join_path(&content(), "themes"))
        };

        match kind {
            ReferenceKind::Site => self.site_url().to_string(),
            ReferenceKind::Home => self.home.clone().unwrap_or_else(|| self.site_url().to_string()),
            ReferenceKind::Content => content(),
            ReferenceKind::Uploads => self
                .uploads
                .clone()
                .unwrap_or_else(|| join_path(&content(), "uploads")),
            ReferenceKind::Plugins => self
                .plugins
                .clone()
                .unwrap_or_else(|| join_path(&content(), "plugins")),
            ReferenceKind::Template => template(),
            ReferenceKind::Stylesheet => self.stylesheet.clone().unwrap_or_else(template),
        }
    }

    /// Build the path prefixer for this site.
    pub fn prefixer(&self) -> UrlPatternPrefixer {
        let bases = ReferenceKind::ALL.map(|kind| (kind, self.base_url(kind)));
        UrlPatternPrefixer::new(
            &self.root_url(),
            bases.iter().map(|(kind, url)| (*kind, url.as_str())),
        )
    }

    /// Validate that configured URLs are absolute http(s) URLs.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(root) = &self.root
            && !is_http_url(root)
        {
            diag.error(
                FieldPath::new("site.root"),
                format!("`{root}` is not an absolute http(s) URL"),
            );
        }

        let configured = [
            &self.url,
            &self.home,
            &self.uploads,
            &self.content,
            &self.plugins,
            &self.template,
            &self.stylesheet,
        ];
        for ((_, field), value) in Self::FIELDS.iter().zip(configured) {
            if let Some(url) = value
                && !is_http_url(url)
            {
                diag.error_with_hint(
                    *field,
                    format!("`{url}` is not an absolute http(s) URL"),
                    "use a full URL such as \"https://example.com/blog/\"",
                );
            }
        }

        if self.url.is_none() && self.root.is_some() {
            diag.warn(
                FieldPath::new("site.url"),
                "`site.root` is set without `site.url`; all locations resolve to the root",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults_resolve_to_root() {
        let config = test_parse_config("");
        let prefixer = config.site.prefixer();
        assert_eq!(prefixer.prefix(ReferenceKind::Site), "");
        assert_eq!(prefixer.prefix(ReferenceKind::Home), "");
        assert_eq!(prefixer.prefix(ReferenceKind::Uploads), "/wp-content/uploads");
        assert_eq!(prefixer.prefix(ReferenceKind::Plugins), "/wp-content/plugins");
        assert_eq!(prefixer.prefix(ReferenceKind::Stylesheet), "/wp-content/themes");
    }

    #[test]
    fn test_subdirectory_site() {
        let config = test_parse_config(
            r#"[site]
url = "https://example.com/blog/"
stylesheet = "https://example.com/blog/wp-content/themes/child"
"#,
        );
        assert_eq!(config.site.root_url(), "https://example.com/");
        assert_eq!(
            config.site.base_url(ReferenceKind::Uploads),
            "https://example.com/blog/wp-content/uploads"
        );

        let prefixer = config.site.prefixer();
        assert_eq!(prefixer.prefix(ReferenceKind::Site), "/blog");
        assert_eq!(prefixer.prefix(ReferenceKind::Template), "/blog/wp-content/themes");
        assert_eq!(
            prefixer.prefix(ReferenceKind::Stylesheet),
            "/blog/wp-content/themes/child"
        );
    }

    #[test]
    fn test_explicit_root() {
        let config = test_parse_config(
            r#"[site]
root = "https://example.com/sites/"
url = "https://example.com/sites/shop/"
"#,
        );
        assert_eq!(config.site.prefixer().prefix(ReferenceKind::Site), "/shop");
    }

    #[test]
    fn test_validate_rejects_relative_urls() {
        let config = test_parse_config("[site]\nurl = \"/blog\"\nuploads = \"https://ex.com/up\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "site.url");
    }
}
