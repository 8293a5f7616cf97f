//! Preconnect hints.

use std::borrow::Cow;

use rustc_hash::FxHashSet;

use super::{HintRelation, merge_preconnect_hints};
use crate::config::PagetuneConfig;
use crate::core::inject;
use crate::debug;
use crate::fonts::implied_preconnect_origins;
use crate::utils::html::{escape_attr, start_tags};

/// One origin the browser should connect to early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRecord {
    /// `scheme://host`, or `//host` when the entry had no scheme.
    pub origin: String,
    pub cross_origin: bool,
}

impl HintRecord {
    pub fn to_markup(&self) -> String {
        let crossorigin = if self.cross_origin { " crossorigin" } else { "" };
        format!(
            r#"<link rel="{}" href="{}"{crossorigin}>"#,
            HintRelation::Preconnect.as_str(),
            escape_attr(&self.origin)
        )
    }
}

/// Origin of a preconnect entry.
///
/// `https://a.com/x` -> `https://a.com`, `a.com` and `//a.com` -> `//a.com`.
/// Returns `None` when no host can be found.
pub fn parse_origin(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }

    if entry.contains("://") {
        let parsed = url::Url::parse(entry).ok()?;
        let host = parsed.host_str()?;
        return Some(format!("{}://{host}", parsed.scheme()));
    }

    let bare = entry.strip_prefix("//").unwrap_or(entry);
    let parsed = url::Url::parse(&format!("http://{bare}")).ok()?;
    parsed.host_str().map(|host| format!("//{host}"))
}

/// Build hint records for `entries`, in order, one per distinct origin.
///
/// An origin gets `crossorigin` when it appears in `crossorigin`.
pub fn build_preconnect_hints<S: AsRef<str>>(entries: &[S], crossorigin: &[String]) -> Vec<HintRecord> {
    let mut seen = FxHashSet::default();

    entries
        .iter()
        .filter_map(|entry| {
            let origin = parse_origin(entry.as_ref());
            if origin.is_none() {
                debug!("hints"; "skipping invalid preconnect entry `{}`", entry.as_ref());
            }
            origin
        })
        .filter(|origin| seen.insert(origin.clone()))
        .map(|origin| HintRecord {
            cross_origin: crossorigin
                .iter()
                .any(|allowed| allowed.trim_end_matches('/') == origin),
            origin,
        })
        .collect()
}

/// Preconnect hints already present in the page.
fn collected_hints(html: &str) -> Vec<HintRecord> {
    start_tags(html, "link")
        .filter(|tag| tag.has_rel(HintRelation::Preconnect.as_str()))
        .filter_map(|tag| {
            Some(HintRecord {
                origin: tag.attr("href")?.trim_end_matches('/').to_string(),
                cross_origin: tag.attr("crossorigin").is_some(),
            })
        })
        .collect()
}

/// Add configured preconnect hints to `html`.
///
/// Hints already present in the page are kept. New ones are injected at
/// the hints anchor.
pub fn inject_preconnect<'a>(html: &'a str, config: &PagetuneConfig) -> Cow<'a, str> {
    let mut entries = config.hints.preconnect_entries();
    entries.extend(
        implied_preconnect_origins(config.fonts.mode)
            .iter()
            .map(|o| o.to_string()),
    );

    let hints = build_preconnect_hints(&entries, &config.hints.crossorigin);
    let mut collected = collected_hints(html);
    let existing = collected.len();
    merge_preconnect_hints(&mut collected, HintRelation::Preconnect, hints);

    let markup: String = collected[existing..].iter().map(HintRecord::to_markup).collect();
    debug!("hints"; "adding {} preconnect hint(s)", collected.len() - existing);
    inject(&markup, html, &config.hints.anchor)
}
