//! Replacement markup for collected font references.

use percent_encoding::percent_decode_str;

use super::extract::{AGGREGATED_ID, FontReference, STYLESHEET_HOST};
use crate::config::FontsConfig;

/// Web font loader script requested by the async-loader mode.
pub const LOADER_SRC: &str = "https://ajax.googleapis.com/ajax/libs/webfont/1/webfont.js";

/// Legacy family string shared by every reference, before display handling.
///
/// `Roboto`, `Open+Sans|Lato` + `latin` -> `Roboto%7COpen+Sans%7CLato&subset=latin`
fn aggregate_family_string(refs: &[FontReference]) -> String {
    let families = refs
        .iter()
        .flat_map(|r| r.families.iter().map(String::as_str))
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join("|");
    let subsets = refs
        .iter()
        .flat_map(|r| r.subsets.iter().map(String::as_str))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let mut out = families;
    if !subsets.is_empty() {
        out.push_str("&subset=");
        out.push_str(&subsets.replace(',', "%2C"));
    }
    out.replace('|', "%7C")
}

/// Final family query: the configured override or the aggregated string,
/// with the display parameter appended when absent.
pub fn family_query(refs: &[FontReference], config: &FontsConfig) -> String {
    let mut query = match &config.family {
        Some(family) => family.clone(),
        None => aggregate_family_string(refs),
    };
    if !query.contains("display=") {
        query.push_str(&config.display);
    }
    query
}

/// One stylesheet `<link>` for every collected family.
///
/// Deferred links load as `media="print"` and switch to `all` once loaded,
/// which keeps them off the critical rendering path.
pub fn aggregate_link(refs: &[FontReference], config: &FontsConfig, deferred: bool) -> String {
    let href = format!(
        "https://{STYLESHEET_HOST}/css?family={}",
        family_query(refs, config).replace('"', "%22")
    );
    let media = if deferred {
        r#" media="print" onload="this.onload=null;this.media='all';""#
    } else {
        ""
    };
    format!(r#"<link rel="stylesheet" id="{AGGREGATED_ID}"{media} href="{href}">"#)
}

/// Families as the web font loader expects them: `Name:variants:subsets`
/// decoded, spaces instead of `+`.
pub fn loader_families(refs: &[FontReference]) -> Vec<String> {
    refs.iter()
        .flat_map(|r| {
            let subsets = r.subsets.join(",");
            r.families.iter().map(move |family| {
                let entry = if subsets.is_empty() {
                    family.clone()
                } else {
                    format!("{family}:{subsets}")
                };
                url_decode(&entry).trim_matches(',').to_string()
            })
        })
        .filter(|f| !f.is_empty())
        .collect()
}

/// Configuration and bootstrap scripts for the async loader.
///
/// Returns `(config, loader)`. The config script goes at the font anchor, the
/// loader right before `</head>`.
pub fn async_loader(refs: &[FontReference]) -> (String, String) {
    let families = serde_json::to_string(&loader_families(refs))
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    let config = format!(
        "<script data-cfasync=\"false\" id=\"{AGGREGATED_ID}_config\">\
         WebFontConfig={{google:{{families:{families}}},classes:false,events:false,timeout:1500}};\
         </script>"
    );
    let loader = format!(
        "<script data-cfasync=\"false\" id=\"{AGGREGATED_ID}_loader\">\
         (function(d){{var wf=d.createElement('script'),s=d.scripts[0];\
         wf.src='{LOADER_SRC}';wf.async=true;s.parentNode.insertBefore(wf,s);}})(document);\
         </script>"
    );
    (config, loader)
}

/// `application/x-www-form-urlencoded` style decoding (`+` is a space).
fn url_decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
