//! Font stylesheet reference extraction.
//!
//! Two query syntaxes reach the same stylesheet endpoint:
//!
//! ```text
//! legacy:  //fonts.googleapis.com/css?family=Roboto:400,700|Open+Sans&subset=latin,cyrillic
//! current: //fonts.googleapis.com/css2?family=Roboto:ital,wght@0,400;1,700&family=Lato&display=swap
//! ```
//!
//! Both are reduced to the legacy family/subset lists so that aggregation
//! does not care which one a page used.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::utils::html::{StartTag, start_tags, strip_comments, unescape};

/// Host serving the font stylesheets.
pub const STYLESHEET_HOST: &str = "fonts.googleapis.com";

/// `id` of the link tag produced by aggregation.
pub const AGGREGATED_ID: &str = "pagetune_optimized_gfonts";

/// One font stylesheet `<link>` found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontReference {
    /// The tag exactly as it appears in the page.
    pub raw_tag: String,
    /// Legacy-syntax family tokens, in source order.
    pub families: Vec<String>,
    /// Requested subsets, in source order.
    pub subsets: Vec<String>,
}

/// Query syntax of a font stylesheet URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySyntax {
    /// `css?family=A|B&subset=x,y`
    Legacy,
    /// `css2?family=A:ital,wght@...&family=B`
    Current,
}

/// Collect every font stylesheet reference in `html`.
///
/// Commented-out markup is ignored, as are `dns-prefetch` hints, tags
/// produced by an earlier aggregation, and references without any family.
pub fn collect_references(html: &str) -> Vec<FontReference> {
    let working = strip_comments(html);

    start_tags(&working, "link")
        .filter(|tag| !tag.has_rel("dns-prefetch"))
        .filter(|tag| tag.attr("id") != Some(AGGREGATED_ID))
        .filter_map(|tag| reference_from_tag(&tag))
        .collect()
}

fn reference_from_tag(tag: &StartTag<'_>) -> Option<FontReference> {
    let href = unescape(tag.attr("href")?);
    let syntax = stylesheet_syntax(&href)?;
    let (families, subsets) = parse_query(&href, syntax);

    if families.is_empty() {
        crate::debug!("fonts"; "skipping reference without families: {}", tag.raw);
        return None;
    }

    Some(FontReference {
        raw_tag: tag.raw.to_string(),
        families,
        subsets,
    })
}

/// Detect whether `href` points at the font stylesheet endpoint.
///
/// Accepts `http:`, `https:` and protocol-relative URLs, ASCII
/// case-insensitive. Returns the query syntax on a match.
pub fn stylesheet_syntax(href: &str) -> Option<QuerySyntax> {
    let lower = href.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https:")
        .or_else(|| lower.strip_prefix("http:"))
        .unwrap_or(&lower);
    let path = rest.strip_prefix("//")?.strip_prefix(STYLESHEET_HOST)?;

    if path.starts_with("/css2") {
        Some(QuerySyntax::Current)
    } else if path.starts_with("/css") && path.len() > "/css".len() {
        Some(QuerySyntax::Legacy)
    } else {
        None
    }
}

/// Extract legacy family tokens and subsets from a stylesheet URL.
fn parse_query(href: &str, syntax: QuerySyntax) -> (Vec<String>, Vec<String>) {
    let Some((_, query)) = href.split_once('?') else {
        return (Vec::new(), Vec::new());
    };

    match syntax {
        QuerySyntax::Legacy => parse_legacy_query(query),
        QuerySyntax::Current => parse_current_query(&percent_decode(query)),
    }
}

/// `family=A|B&subset=x,y` (pipes may arrive as `%7C`).
fn parse_legacy_query(query: &str) -> (Vec<String>, Vec<String>) {
    let mut families = Vec::new();
    let mut subsets = Vec::new();

    for (key, value) in query_params(query) {
        match key {
            "family" if families.is_empty() => {
                families = value
                    .replace("%7C", "|")
                    .replace("%7c", "|")
                    .split('|')
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect();
            }
            "subset" => subsets = split_subsets(&percent_decode(value)),
            _ => {}
        }
    }

    (families, subsets)
}

/// `family=A:ital,wght@0,400;1,700&family=B` (already percent-decoded).
fn parse_current_query(query: &str) -> (Vec<String>, Vec<String>) {
    let mut families = Vec::new();
    let mut subsets = Vec::new();

    for (key, value) in query_params(query) {
        match key {
            "family" => families.extend(current_family_to_legacy(value)),
            "subset" => subsets = split_subsets(value),
            _ => {}
        }
    }

    (families, subsets)
}

static FAMILY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^:]+)(?::(?P<axes>[A-Za-z,]+)@(?P<tuples>[0-9.,;]+))?$")
        .expect("family pattern is valid")
});

/// Convert one current-syntax family to its legacy token.
///
/// Only the italic style survives: `Roboto:ital,wght@0,400;1,700` becomes
/// `Roboto:italic`, `Roboto:wght@400;700` becomes `Roboto`. Weights are
/// dropped.
fn current_family_to_legacy(spec: &str) -> Option<String> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }

    let Some(caps) = FAMILY_PATTERN.captures(spec) else {
        // Unknown axis syntax: keep the bare family name
        let name = spec.split(':').next().unwrap_or(spec);
        return (!name.is_empty()).then(|| name.to_string());
    };

    let name = &caps["name"];
    let italic = match (caps.name("axes"), caps.name("tuples")) {
        (Some(axes), Some(tuples)) => has_italic(axes.as_str(), tuples.as_str()),
        _ => false,
    };

    Some(if italic {
        format!("{name}:italic")
    } else {
        name.to_string()
    })
}

/// Whether any tuple sets the `ital` axis to 1.
fn has_italic(axes: &str, tuples: &str) -> bool {
    let Some(ital) = axes.split(',').position(|a| a == "ital") else {
        return false;
    };
    tuples
        .split(';')
        .any(|tuple| tuple.split(',').nth(ital) == Some("1"))
}

fn split_subsets(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Split a query string into `key=value` pairs (value may be empty).
fn query_params(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| p.split_once('=').unwrap_or((p, "")))
}

/// Percent-decode, leaving `+` untouched.
fn percent_decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> String {
        format!(r#"<link rel="stylesheet" href="{href}">"#)
    }

    #[test]
    fn test_stylesheet_syntax() {
        assert_eq!(
            stylesheet_syntax("https://fonts.googleapis.com/css?family=A"),
            Some(QuerySyntax::Legacy)
        );
        assert_eq!(
            stylesheet_syntax("//FONTS.GOOGLEAPIS.COM/css2?family=A"),
            Some(QuerySyntax::Current)
        );
        assert_eq!(stylesheet_syntax("http://fonts.googleapis.com/css"), None);
        assert_eq!(stylesheet_syntax("https://fonts.gstatic.com/css?family=A"), None);
        assert_eq!(stylesheet_syntax("https://example.com/fonts.googleapis.com/css?x"), None);
    }

    #[test]
    fn test_legacy_families_and_subsets() {
        let html = link("https://fonts.googleapis.com/css?family=Open+Sans:400,700%7CLato&subset=latin%2Clatin-ext");
        let refs = collect_references(&html);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].families, vec!["Open+Sans:400,700", "Lato"]);
        assert_eq!(refs[0].subsets, vec!["latin", "latin-ext"]);
        assert_eq!(refs[0].raw_tag, html);
    }

    #[test]
    fn test_entity_encoded_ampersand() {
        let html = link("//fonts.googleapis.com/css?family=Roboto&amp;subset=greek");
        let refs = collect_references(&html);
        assert_eq!(refs[0].families, vec!["Roboto"]);
        assert_eq!(refs[0].subsets, vec!["greek"]);
    }

    #[test]
    fn test_current_syntax_italic() {
        let html = link("https://fonts.googleapis.com/css2?family=Roboto:ital,wght@0,400;1,700&display=swap");
        let refs = collect_references(&html);
        assert_eq!(refs[0].families, vec!["Roboto:italic"]);
        assert!(refs[0].subsets.is_empty());
    }

    #[test]
    fn test_current_syntax_multiple_families() {
        let html = link(
            "https://fonts.googleapis.com/css2?family=Open+Sans:wght@400;700&family=Lato:ital@0;1&family=Inter&display=swap",
        );
        let refs = collect_references(&html);
        assert_eq!(refs[0].families, vec!["Open+Sans", "Lato:italic", "Inter"]);
    }

    #[test]
    fn test_current_syntax_percent_encoded() {
        let html = link("https://fonts.googleapis.com/css2?family=Roboto%3Aital%2Cwght%401%2C400");
        let refs = collect_references(&html);
        assert_eq!(refs[0].families, vec!["Roboto:italic"]);
    }

    #[test]
    fn test_skips_dns_prefetch_and_comments() {
        let html = format!(
            "<link rel='dns-prefetch' href='//fonts.googleapis.com/css?family=A'>\
             <!-- {} -->",
            link("https://fonts.googleapis.com/css?family=B")
        );
        assert!(collect_references(&html).is_empty());
    }

    #[test]
    fn test_skips_empty_family() {
        let html = link("https://fonts.googleapis.com/css?family=%7C&subset=latin");
        assert!(collect_references(&html).is_empty());
        let html = link("https://fonts.googleapis.com/css?subset=latin");
        assert!(collect_references(&html).is_empty());
    }

    #[test]
    fn test_skips_aggregated_tag() {
        let html = format!(
            r#"<link rel="stylesheet" id="{AGGREGATED_ID}" href="https://fonts.googleapis.com/css?family=A">"#
        );
        assert!(collect_references(&html).is_empty());
    }

    #[test]
    fn test_attribute_order_and_case() {
        let html = r#"<LINK HREF="https://fonts.googleapis.com/css?family=A" REL="stylesheet" type="text/css" />"#;
        let refs = collect_references(html);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].raw_tag, html);
    }

    #[test]
    fn test_malformed_href_not_matched() {
        let html = "<link rel=\"stylesheet\" href=\"https://fonts.googleapis.com/css?family=A>\n<p class=\"x\">";
        assert!(collect_references(html).is_empty());
    }

    #[test]
    fn test_current_family_to_legacy() {
        assert_eq!(current_family_to_legacy("Roboto").as_deref(), Some("Roboto"));
        assert_eq!(current_family_to_legacy("Roboto:wght@100..900").as_deref(), Some("Roboto"));
        assert_eq!(current_family_to_legacy("Roboto:ital@1").as_deref(), Some("Roboto:italic"));
        assert_eq!(current_family_to_legacy("Roboto:ital,wght@0,400").as_deref(), Some("Roboto"));
        assert_eq!(current_family_to_legacy("Roboto:opsz@bad!").as_deref(), Some("Roboto"));
        assert_eq!(current_family_to_legacy(""), None);
    }
}
