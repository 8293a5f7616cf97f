//! Resource hints: preconnect and preload markup.
//!
//! - [`preconnect`] turns a domain allowlist into [`HintRecord`]s
//! - [`preload`] turns a URL allowlist into [`PreloadRecord`]s
//!
//! Both render plain `<link>` tags and are placed with [`crate::core::inject`].

pub mod preconnect;
pub mod preload;

pub use preconnect::{HintRecord, build_preconnect_hints, inject_preconnect, parse_origin};
pub use preload::{PreloadRecord, build_preload_records, inject_preload, preload_candidates};

use std::borrow::Cow;

use crate::utils::html::start_tags;

/// Relation type of a resource hint (`rel` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintRelation {
    DnsPrefetch,
    Preconnect,
    Prefetch,
    Prerender,
}

impl HintRelation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DnsPrefetch => "dns-prefetch",
            Self::Preconnect => "preconnect",
            Self::Prefetch => "prefetch",
            Self::Prerender => "prerender",
        }
    }
}

/// Merge `hints` into the ones already `collected` for `relation`.
///
/// Only preconnect hints are contributed. Existing entries are kept and
/// origins already present are not added twice.
pub fn merge_preconnect_hints(
    collected: &mut Vec<HintRecord>,
    relation: HintRelation,
    hints: impl IntoIterator<Item = HintRecord>,
) {
    if relation != HintRelation::Preconnect {
        return;
    }
    for hint in hints {
        if !collected.iter().any(|c| c.origin == hint.origin) {
            collected.push(hint);
        }
    }
}

/// Drop `dns-prefetch` URLs that point at `host`.
///
/// Lists for any other relation come back unchanged.
pub fn remove_dns_prefetch(urls: Vec<String>, relation: HintRelation, host: &str) -> Vec<String> {
    if relation != HintRelation::DnsPrefetch {
        return urls;
    }
    urls.into_iter().filter(|url| !url.contains(host)).collect()
}

/// Remove `<link rel="dns-prefetch">` tags pointing at `host`.
pub fn strip_dns_prefetch_tags<'a>(html: &'a str, host: &str) -> Cow<'a, str> {
    let tags: Vec<_> = start_tags(html, "link")
        .filter(|tag| tag.has_rel(HintRelation::DnsPrefetch.as_str()))
        .filter_map(|tag| Some((tag.raw, tag.attr("href")?.to_string())))
        .collect();

    let kept = remove_dns_prefetch(
        tags.iter().map(|(_, href)| href.clone()).collect(),
        HintRelation::DnsPrefetch,
        host,
    );
    let dropped: Vec<&str> = tags
        .iter()
        .filter(|(_, href)| !kept.contains(href))
        .map(|(raw, _)| *raw)
        .collect();

    if dropped.is_empty() {
        return Cow::Borrowed(html);
    }

    let mut out = html.to_string();
    for raw in dropped {
        out = out.replace(raw, "");
    }
    Cow::Owned(out)
}
