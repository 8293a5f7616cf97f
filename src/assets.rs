//! Version query removal for script and stylesheet URLs.
//!
//! `https://x.com/app.js?ver=6.4&lang=en` -> `https://x.com/app.js?lang=en`

use std::borrow::Cow;

use crate::utils::html::{escape_attr, start_tags, unescape};

/// Remove the `ver` query argument from `src`, or `v` when there is no `ver`.
///
/// Only URLs whose query starts with `?ver=` or `?v=` are touched. Other
/// arguments and the fragment are kept.
pub fn strip_version_query(src: &str) -> Cow<'_, str> {
    let key = if src.find("?ver=").is_some_and(|i| i > 0) {
        "ver"
    } else if src.find("?v=").is_some_and(|i| i > 0) {
        "v"
    } else {
        return Cow::Borrowed(src);
    };

    let (without_fragment, fragment) = match src.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (src, None),
    };
    let Some((base, query)) = without_fragment.split_once('?') else {
        return Cow::Borrowed(src);
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| param.split('=').next() != Some(key))
        .collect();

    let mut out = base.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    Cow::Owned(out)
}

/// Strip version queries from `<script src>` and stylesheet `<link href>`.
pub fn strip_version_queries(html: &str) -> Cow<'_, str> {
    let scripts = start_tags(html, "script").filter_map(|tag| tag.attr("src"));
    let styles = start_tags(html, "link")
        .filter(|tag| tag.has_rel("stylesheet"))
        .filter_map(|tag| tag.attr("href"));

    // Attribute values borrow from `html`, so their offsets can be recovered
    let mut edits: Vec<(usize, usize, String)> = scripts
        .chain(styles)
        .filter_map(|value| {
            let decoded = unescape(value);
            let Cow::Owned(stripped) = strip_version_query(&decoded) else {
                return None;
            };
            let start = value.as_ptr() as usize - html.as_ptr() as usize;
            Some((start, start + value.len(), escape_attr(&stripped).into_owned()))
        })
        .collect();

    if edits.is_empty() {
        return Cow::Borrowed(html);
    }
    edits.sort_by_key(|(start, _, _)| *start);

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    for (start, end, replacement) in edits {
        out.push_str(&html[pos..start]);
        out.push_str(&replacement);
        pos = end;
    }
    out.push_str(&html[pos..]);
    Cow::Owned(out)
}
