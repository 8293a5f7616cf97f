//! Path prefixes for site reference kinds.
//!
//! A site may live below the origin root (`https://example.com/blog/`) and
//! keep its uploads, plugins and theme files in further sub-directories.
//! [`UrlPatternPrefixer`] turns root-relative wildcard patterns such as
//! `/wp-admin/*` into patterns that match where those locations really are.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// PathPattern
// ============================================================================

/// Wildcard URL path pattern. Always begins with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PathPattern(String);

impl PathPattern {
    /// Create a pattern, adding the leading `/` if missing.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if pattern.starts_with('/') {
            Self(pattern)
        } else {
            Self(format!("/{pattern}"))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PathPattern {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// ReferenceKind
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrefixError {
    #[error("unknown reference kind `{0}` (expected one of: {list})", list = ReferenceKind::NAMES.join(", "))]
    UnknownKind(String),
}

/// Named site location a path pattern can be relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceKind {
    /// Where the site's own files live (login, admin).
    #[default]
    Site,
    /// Public front page.
    Home,
    /// Uploaded media directory.
    Uploads,
    /// Content directory (themes, plugins, uploads parent).
    Content,
    /// Plugins directory.
    Plugins,
    /// Directory of the active parent theme.
    Template,
    /// Directory of the active child theme (same as `Template` without one).
    Stylesheet,
}

impl ReferenceKind {
    pub const ALL: [Self; 7] = [
        Self::Site,
        Self::Home,
        Self::Uploads,
        Self::Content,
        Self::Plugins,
        Self::Template,
        Self::Stylesheet,
    ];

    const NAMES: [&'static str; 7] = [
        "site",
        "home",
        "uploads",
        "content",
        "plugins",
        "template",
        "stylesheet",
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

impl FromStr for ReferenceKind {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(Self::Site),
            "home" => Ok(Self::Home),
            "uploads" => Ok(Self::Uploads),
            "content" => Ok(Self::Content),
            "plugins" => Ok(Self::Plugins),
            "template" | "active-theme-template" => Ok(Self::Template),
            "stylesheet" | "active-theme-stylesheet" => Ok(Self::Stylesheet),
            other => Err(PrefixError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// UrlPatternPrefixer
// ============================================================================

/// Computes and applies per-kind path prefixes.
///
/// The prefix of a kind is the part of its base URL path below the site
/// root path, with trailing slashes dropped and URL-pattern syntax escaped:
///
/// | root                    | base                                       | prefix                 |
/// |-------------------------|--------------------------------------------|------------------------|
/// | `https://ex.com/`       | `https://ex.com/`                          | ``                     |
/// | `https://ex.com/`       | `https://ex.com/blog/`                     | `/blog`                |
/// | `https://ex.com/`       | `https://ex.com/blog/wp-content/uploads`   | `/blog/wp-content/uploads` |
#[derive(Debug, Clone, Default)]
pub struct UrlPatternPrefixer {
    prefixes: [String; 7],
}

impl UrlPatternPrefixer {
    /// Build from the site root URL and the base URL of each kind.
    ///
    /// Kinds missing from `bases` resolve to the root (empty prefix).
    pub fn new<'a>(root: &str, bases: impl IntoIterator<Item = (ReferenceKind, &'a str)>) -> Self {
        let root_path = url_path(root);
        let mut prefixes: [String; 7] = Default::default();

        for (kind, base) in bases {
            prefixes[kind.index()] = escape_pattern(relative_path(&root_path, &url_path(base)));
        }

        Self { prefixes }
    }

    /// Computed prefix for `kind` (empty when it resolves to the root).
    #[inline]
    pub fn prefix(&self, kind: ReferenceKind) -> &str {
        &self.prefixes[kind.index()]
    }

    /// Prefix `pattern` for the given reference kind.
    ///
    /// Returns `prefix + pattern` when the prefix is non-empty, otherwise the
    /// pattern unchanged. A pattern already inside the prefix is left alone.
    pub fn prefix_path_pattern(&self, pattern: &str, kind: ReferenceKind) -> PathPattern {
        let pattern = PathPattern::new(pattern);
        let prefix = self.prefix(kind);

        if prefix.is_empty() || is_within(pattern.as_str(), prefix) {
            return pattern;
        }
        PathPattern(format!("{prefix}{pattern}"))
    }

    /// Prefix `pattern` relative to [`ReferenceKind::Site`].
    #[inline]
    pub fn prefix_site_pattern(&self, pattern: &str) -> PathPattern {
        self.prefix_path_pattern(pattern, ReferenceKind::Site)
    }

    /// Prefix `pattern` for a reference kind given by name.
    ///
    /// Fails on kind names that don't exist.
    pub fn prefix_path_pattern_named(
        &self,
        pattern: &str,
        kind: &str,
    ) -> Result<PathPattern, PrefixError> {
        Ok(self.prefix_path_pattern(pattern, kind.parse()?))
    }
}

/// Path component of a URL without trailing slashes.
///
/// Non-URL input is taken as a path itself.
fn url_path(input: &str) -> String {
    match url::Url::parse(input) {
        Ok(parsed) => parsed.path().trim_end_matches('/').to_string(),
        Err(_) if input.starts_with('/') => input.trim_end_matches('/').to_string(),
        Err(_) => String::new(),
    }
}

/// `base` with the `root` directory stripped, when `base` lies below it.
fn relative_path<'a>(root: &str, base: &'a str) -> &'a str {
    match base.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => base,
    }
}

/// Whether `pattern` is `prefix` itself or lies below it.
fn is_within(pattern: &str, prefix: &str) -> bool {
    pattern
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Escape characters with meaning in URL patterns.
fn escape_pattern(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '+' | '*' | '?' | ':' | '{' | '}' | '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn subdir_prefixer() -> UrlPatternPrefixer {
        UrlPatternPrefixer::new(
            "https://example.com/",
            [
                (ReferenceKind::Site, "https://example.com/blog/"),
                (ReferenceKind::Home, "https://example.com/blog"),
                (ReferenceKind::Uploads, "https://example.com/blog/wp-content/uploads"),
                (ReferenceKind::Content, "https://example.com/blog/wp-content"),
                (ReferenceKind::Plugins, "https://example.com/blog/wp-content/plugins"),
                (ReferenceKind::Template, "https://example.com/blog/wp-content/themes/parent"),
                (ReferenceKind::Stylesheet, "https://example.com/blog/wp-content/themes/child"),
            ],
        )
    }

    #[test]
    fn test_all_kinds_at_root() {
        let prefixer = UrlPatternPrefixer::new(
            "https://example.com",
            ReferenceKind::ALL.map(|k| (k, "https://example.com/")),
        );
        for kind in ReferenceKind::ALL {
            assert_eq!(prefixer.prefix(kind), "");
            assert_eq!(prefixer.prefix_path_pattern("/wp-admin/*", kind).as_str(), "/wp-admin/*");
        }
    }

    #[test]
    fn test_missing_kinds_resolve_to_root() {
        let prefixer = UrlPatternPrefixer::new("https://example.com/", std::iter::empty());
        assert_eq!(prefixer.prefix_path_pattern("/*", ReferenceKind::Uploads).as_str(), "/*");
    }

    #[test]
    fn test_subdirectory_prefixes() {
        let prefixer = subdir_prefixer();
        assert_eq!(prefixer.prefix(ReferenceKind::Site), "/blog");
        assert_eq!(prefixer.prefix_site_pattern("/wp-login.php").as_str(), "/blog/wp-login.php");
        assert_eq!(
            prefixer.prefix_path_pattern("/*", ReferenceKind::Uploads).as_str(),
            "/blog/wp-content/uploads/*"
        );
        assert_eq!(
            prefixer.prefix_path_pattern("/*", ReferenceKind::Stylesheet).as_str(),
            "/blog/wp-content/themes/child/*"
        );
    }

    #[test]
    fn test_prefix_relative_to_root_path() {
        let prefixer = UrlPatternPrefixer::new(
            "https://example.com/sites/",
            [(ReferenceKind::Plugins, "https://example.com/sites/wp-content/plugins/")],
        );
        assert_eq!(prefixer.prefix(ReferenceKind::Plugins), "/wp-content/plugins");
    }

    #[test]
    fn test_no_double_prefix() {
        let prefixer = subdir_prefixer();
        assert_eq!(prefixer.prefix_site_pattern("/blog/cart/*").as_str(), "/blog/cart/*");
        // Shares the prefix text but not the directory
        assert_eq!(prefixer.prefix_site_pattern("/blogroll/*").as_str(), "/blog/blogroll/*");
    }

    #[test]
    fn test_missing_leading_slash_added() {
        let prefixer = subdir_prefixer();
        assert_eq!(prefixer.prefix_site_pattern("cart/*").as_str(), "/blog/cart/*");
        assert_eq!(PathPattern::new("x").as_str(), "/x");
    }

    #[test]
    fn test_prefix_is_escaped() {
        let prefixer = UrlPatternPrefixer::new(
            "https://example.com/",
            [(ReferenceKind::Site, "https://example.com/c++:(x)/")],
        );
        assert_eq!(prefixer.prefix(ReferenceKind::Site), r"/c\+\+\:\(x\)");
        assert_eq!(prefixer.prefix_site_pattern("/*").as_str(), r"/c\+\+\:\(x\)/*");
    }

    #[test]
    fn test_named_kinds() {
        let prefixer = subdir_prefixer();
        assert_eq!(
            prefixer.prefix_path_pattern_named("/*", "active-theme-template").unwrap().as_str(),
            "/blog/wp-content/themes/parent/*"
        );
        let err = prefixer.prefix_path_pattern_named("/*", "media").unwrap_err();
        assert_eq!(err, PrefixError::UnknownKind("media".into()));
        assert!(err.to_string().contains("uploads"));
    }

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in ReferenceKind::ALL {
            assert_eq!(kind.as_str().parse::<ReferenceKind>(), Ok(kind));
        }
    }
}
