//! Speculation rules.
//!
//! Builds the document telling the browser which same-site links it may
//! prefetch or prerender ahead of navigation:
//!
//! ```json
//! {"prerender": [{
//!     "source": "document",
//!     "where": {"and": [
//!         {"href_matches": "/*"},
//!         {"not": {"href_matches": ["/wp-login.php", "/wp-admin/*", ...]}},
//!         {"not": {"selector_matches": "a[rel~=\"nofollow\"]"}},
//!         {"not": {"selector_matches": ".no-prerender"}}
//!     ]},
//!     "eagerness": "moderate"
//! }]}
//! ```
//!
//! Excluded paths are prefixed with [`UrlPatternPrefixer`] so they match
//! when the site lives in a sub-directory.

mod matcher;

pub use matcher::{MatcherNode, PatternList};

use std::borrow::Cow;

use rustc_hash::FxHashSet;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::{Eagerness, PagetuneConfig, SpeculationMode};
use crate::core::{PathPattern, ReferenceKind, UrlPatternPrefixer, inject};
use crate::debug;
use crate::utils::html::start_tags;

/// Content type of the inline script carrying the rules.
pub const SCRIPT_TYPE: &str = "speculationrules";

const BODY_END: &str = "</body>";

/// Paths that are never speculatively loaded, with the kind they live under.
const BUILTIN_EXCLUSIONS: [(&str, ReferenceKind); 8] = [
    ("/wp-login.php", ReferenceKind::Site),
    ("/wp-admin/*", ReferenceKind::Site),
    (r"/*\?*(^|&)_wpnonce=*", ReferenceKind::Home),
    ("/*", ReferenceKind::Uploads),
    ("/*", ReferenceKind::Content),
    ("/*", ReferenceKind::Plugins),
    ("/*", ReferenceKind::Template),
    ("/*", ReferenceKind::Stylesheet),
];

/// One document rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SpeculationRule {
    pub source: &'static str,
    #[serde(rename = "where")]
    pub matcher: MatcherNode,
    pub eagerness: Eagerness,
}

/// Rules keyed by mode: `{"prerender": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeculationRuleDoc {
    pub mode: SpeculationMode,
    pub rules: Vec<SpeculationRule>,
}

impl Serialize for SpeculationRuleDoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.mode.as_str(), &self.rules)?;
        map.end()
    }
}

impl SpeculationRuleDoc {
    /// Inline `<script type="speculationrules">` carrying this document.
    pub fn to_script(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?.replace("</", "<\\/");
        Ok(format!(r#"<script type="{SCRIPT_TYPE}">{json}</script>"#))
    }
}

/// Builds [`SpeculationRuleDoc`]s for one site.
#[derive(Debug, Clone)]
pub struct SpeculationRuleBuilder {
    prefixer: UrlPatternPrefixer,
    mode: SpeculationMode,
    eagerness: Eagerness,
    extra_exclusions: Vec<String>,
}

impl SpeculationRuleBuilder {
    pub fn new(prefixer: UrlPatternPrefixer, mode: SpeculationMode) -> Self {
        Self {
            prefixer,
            mode,
            eagerness: Eagerness::default(),
            extra_exclusions: Vec::new(),
        }
    }

    /// Builder for the configured site, mode, eagerness and exclusions.
    pub fn from_config(config: &PagetuneConfig) -> Self {
        Self::new(config.site.prefixer(), config.speculation.mode)
            .with_eagerness(config.speculation.eagerness)
            .with_exclusions(config.speculation.exclude.iter().cloned())
    }

    pub fn with_eagerness(mut self, eagerness: Eagerness) -> Self {
        self.eagerness = eagerness;
        self
    }

    /// Exclude further site-relative paths. Built-in exclusions stay in place.
    pub fn with_exclusions(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.extra_exclusions.extend(paths);
        self
    }

    /// Built-in exclusions followed by the extra ones, prefixed and
    /// deduplicated in first-seen order.
    pub fn excluded_paths(&self) -> Vec<PathPattern> {
        let builtin = BUILTIN_EXCLUSIONS
            .iter()
            .map(|(pattern, kind)| self.prefixer.prefix_path_pattern(pattern, *kind));
        let extra = self
            .extra_exclusions
            .iter()
            .map(|pattern| self.prefixer.prefix_site_pattern(pattern));

        let mut seen = FxHashSet::default();
        builtin
            .chain(extra)
            .filter(|pattern| seen.insert(pattern.clone()))
            .collect()
    }

    pub fn build(&self) -> SpeculationRuleDoc {
        let mut conditions = vec![
            MatcherNode::href(self.prefixer.prefix_site_pattern("/*")),
            MatcherNode::negate(MatcherNode::hrefs(self.excluded_paths())),
            // Add-to-cart style links are marked nofollow
            MatcherNode::negate(MatcherNode::selector(r#"a[rel~="nofollow"]"#)),
        ];
        if self.mode == SpeculationMode::Prerender {
            conditions.push(MatcherNode::negate(MatcherNode::selector(".no-prerender")));
        }

        SpeculationRuleDoc {
            mode: self.mode,
            rules: vec![SpeculationRule {
                source: "document",
                matcher: MatcherNode::And(conditions),
                eagerness: self.eagerness,
            }],
        }
    }
}

/// Whether the page already carries a speculation rules script.
fn has_rules_script(html: &str) -> bool {
    start_tags(html, "script").any(|tag| {
        tag.attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(SCRIPT_TYPE))
    })
}

/// Add the speculation rules script right before `</body>`.
///
/// Pages that already have one, or have no `</body>`, are left alone.
pub fn inject_rules<'a>(html: &'a str, builder: &SpeculationRuleBuilder) -> Cow<'a, str> {
    if has_rules_script(html) {
        debug!("speculation"; "page already has speculation rules");
        return Cow::Borrowed(html);
    }

    match builder.build().to_script() {
        Ok(script) => inject(&script, html, BODY_END),
        Err(err) => {
            debug!("speculation"; "failed to serialize rules: {}", err);
            Cow::Borrowed(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn builder(content: &str) -> SpeculationRuleBuilder {
        SpeculationRuleBuilder::from_config(&test_parse_config(content))
    }

    fn strings(patterns: &[PathPattern]) -> Vec<&str> {
        patterns.iter().map(PathPattern::as_str).collect()
    }

    #[test]
    fn test_builtin_exclusions_at_root() {
        let builder = builder("[site]\nurl = \"https://example.com\"");
        assert_eq!(
            strings(&builder.excluded_paths()),
            vec![
                "/wp-login.php",
                "/wp-admin/*",
                r"/*\?*(^|&)_wpnonce=*",
                "/wp-content/uploads/*",
                "/wp-content/*",
                "/wp-content/plugins/*",
                "/wp-content/themes/*",
            ]
        );
    }

    #[test]
    fn test_exclusions_in_subdirectory() {
        let builder = builder("[site]\nurl = \"https://example.com/blog/\"\n[speculation]\nexclude = [\"/cart/*\"]");
        let paths = builder.excluded_paths();
        let paths = strings(&paths);
        assert_eq!(paths[0], "/blog/wp-login.php");
        assert_eq!(paths[1], "/blog/wp-admin/*");
        assert_eq!(paths[2], r"/blog/*\?*(^|&)_wpnonce=*");
        assert_eq!(paths.last(), Some(&"/blog/cart/*"));
    }

    #[test]
    fn test_builtins_survive_resupplied_exclusions() {
        let builder = builder(
            "[speculation]\nexclude = [\"/wp-admin/*\", \"/wp-login.php\", \"/feed/\", \"/feed/\"]",
        );
        let paths = builder.excluded_paths();
        let paths = strings(&paths);

        assert_eq!(paths.iter().filter(|p| **p == "/wp-admin/*").count(), 1);
        assert_eq!(paths.iter().filter(|p| **p == "/feed/").count(), 1);
        assert!(paths.contains(&r"/*\?*(^|&)_wpnonce=*"));
        assert_eq!(paths[1], "/wp-admin/*");
    }

    #[test]
    fn test_excluded_paths_never_empty() {
        assert!(!builder("").excluded_paths().is_empty());
    }

    #[test]
    fn test_prerender_document() {
        let doc = builder("").build();
        let json = serde_json::to_value(&doc).unwrap();

        let rule = &json["prerender"][0];
        assert_eq!(rule["source"], "document");
        assert_eq!(rule["eagerness"], "moderate");
        let and = rule["where"]["and"].as_array().unwrap();
        assert_eq!(and.len(), 4);
        assert_eq!(and[0]["href_matches"], "/*");
        assert_eq!(and[2]["not"]["selector_matches"], r#"a[rel~="nofollow"]"#);
        assert_eq!(and[3]["not"]["selector_matches"], ".no-prerender");
    }

    #[test]
    fn test_prefetch_document() {
        let doc = builder("[speculation]\nmode = \"prefetch\"\neagerness = \"conservative\"").build();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json.get("prerender").is_none());
        let rule = &json["prefetch"][0];
        assert_eq!(rule["eagerness"], "conservative");
        assert_eq!(rule["where"]["and"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_inject_rules() {
        let builder = builder("");
        let html = "<html><body><p>hi</p></body></html>";
        let out = inject_rules(html, &builder);
        assert!(out.contains(r#"<script type="speculationrules">{"prerender":"#));
        assert!(out.ends_with("</script></body></html>"));

        // Second pass sees the script and leaves the page alone
        assert_eq!(inject_rules(&out, &builder), out);
    }

    #[test]
    fn test_inject_rules_without_body() {
        let html = "<p>fragment</p>";
        assert!(matches!(inject_rules(html, &builder("")), Cow::Borrowed(_)));
    }
}
