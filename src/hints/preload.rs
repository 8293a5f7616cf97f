//! Preload hints.
//!
//! Each candidate URL becomes one `<link rel="preload">`. The `as`
//! destination, MIME type and `crossorigin` flag come from the file
//! extension:
//!
//! | extension                        | as       | type                            | crossorigin |
//! |----------------------------------|----------|---------------------------------|-------------|
//! | css                              | style    |                                 |             |
//! | js                               | script   |                                 |             |
//! | woff, woff2, ttf, otf            | font     | `font/<ext>`                    | yes         |
//! | eot                              | font     | `application/vnd.ms-fontobject` | yes         |
//! | jpeg, jpg, webp, png, gif, svg   | image    |                                 |             |
//! | anything else                    | other    |                                 |             |

use std::borrow::Cow;

use crate::config::PagetuneConfig;
use crate::config::util::split_list;
use crate::core::inject;
use crate::debug;
use crate::utils::html::escape_attr;
use crate::utils::mime::{self, Destination};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadRecord {
    pub url: String,
    pub destination: Destination,
    pub mime_type: Option<&'static str>,
    pub cross_origin: bool,
}

impl PreloadRecord {
    /// Build a record for `url`, or `None` when it is not an absolute URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if !is_absolute_url(url) {
            return None;
        }

        let ext = mime::extension_of(url);
        let destination = mime::destination(ext.as_deref());
        let mime_type = match destination {
            Destination::Font => ext.as_deref().and_then(mime::font_type),
            _ => None,
        };

        Some(Self {
            url: url.to_string(),
            destination,
            mime_type,
            cross_origin: destination == Destination::Font,
        })
    }

    pub fn to_markup(&self) -> String {
        let mut tag = format!(
            r#"<link rel="preload" href="{}" as="{}""#,
            escape_attr(&self.url),
            self.destination.as_str()
        );
        if let Some(mime_type) = self.mime_type {
            tag.push_str(&format!(r#" type="{mime_type}""#));
        }
        if self.cross_origin {
            tag.push_str(" crossorigin");
        }
        tag.push('>');
        tag
    }
}

/// Whether `url` is a syntactically complete absolute URL with a host.
fn is_absolute_url(url: &str) -> bool {
    !url.is_empty()
        && url.trim() == url
        && url::Url::parse(url).is_ok_and(|parsed| parsed.has_host())
}

/// Every preload candidate for the current page, in order.
///
/// Per-page preloads are only honoured while the image features are off,
/// since those already take care of the page's images.
pub fn preload_candidates(config: &PagetuneConfig) -> Vec<String> {
    let hints = &config.hints;
    let mut candidates = split_list(&hints.preload);
    if !config.images.any_active() {
        candidates.extend(split_list(&hints.page_preload));
    }
    candidates.extend(hints.extra_preload.iter().map(|u| u.trim().to_string()));
    candidates.retain(|u| !u.is_empty());
    candidates
}

/// Records for every valid candidate. Invalid entries are skipped.
pub fn build_preload_records<S: AsRef<str>>(candidates: &[S]) -> Vec<PreloadRecord> {
    candidates
        .iter()
        .filter_map(|url| {
            let record = PreloadRecord::from_url(url.as_ref());
            if record.is_none() {
                debug!("hints"; "skipping invalid preload url `{}`", url.as_ref());
            }
            record
        })
        .collect()
}

/// Add preload hints for every configured URL to `html`.
pub fn inject_preload<'a>(html: &'a str, config: &PagetuneConfig) -> Cow<'a, str> {
    let records = build_preload_records(&preload_candidates(config));
    let markup: String = records.iter().map(PreloadRecord::to_markup).collect();
    debug!("hints"; "adding {} preload hint(s)", records.len());
    inject(&markup, html, &config.hints.anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn markup(url: &str) -> Option<String> {
        PreloadRecord::from_url(url).map(|r| r.to_markup())
    }

    #[test]
    fn test_eot_font() {
        assert_eq!(
            markup("https://x.com/a.eot?v=2").as_deref(),
            Some(
                r#"<link rel="preload" href="https://x.com/a.eot?v=2" as="font" type="application/vnd.ms-fontobject" crossorigin>"#
            )
        );
    }

    #[test]
    fn test_woff2_font() {
        let record = PreloadRecord::from_url("https://x.com/fonts/inter.WOFF2").unwrap();
        assert_eq!(record.destination, Destination::Font);
        assert_eq!(record.mime_type, Some("font/woff2"));
        assert!(record.cross_origin);
    }

    #[test]
    fn test_image_has_no_type() {
        assert_eq!(
            markup("https://x.com/img.svg").as_deref(),
            Some(r#"<link rel="preload" href="https://x.com/img.svg" as="image">"#)
        );
    }

    #[test]
    fn test_style_script_other() {
        let dest = |url| PreloadRecord::from_url(url).unwrap().destination;
        assert_eq!(dest("https://x.com/a.css?ver=1"), Destination::Style);
        assert_eq!(dest("https://x.com/a.js"), Destination::Script);
        assert_eq!(dest("https://x.com/data.json"), Destination::Other);
        assert_eq!(dest("https://x.com/"), Destination::Other);
    }

    #[test]
    fn test_invalid_urls_skipped() {
        assert!(markup("not a url").is_none());
        assert!(markup("/fonts/a.woff2").is_none());
        assert!(markup(" https://x.com/a.css").is_none());
        assert!(markup("mailto:a@x.com").is_none());
        assert_eq!(
            build_preload_records(&["not a url", "https://x.com/a.css"]).len(),
            1
        );
    }

    #[test]
    fn test_escapes_href() {
        assert!(markup("https://x.com/a.css?a=1&b=2").unwrap().contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_candidates_respect_image_flags() {
        let content = r#"[hints]
preload = "https://x.com/a.css"
page_preload = "https://x.com/hero.webp"
extra_preload = ["https://x.com/b.js"]
"#;
        let config = test_parse_config(content);
        assert_eq!(
            preload_candidates(&config),
            vec!["https://x.com/a.css", "https://x.com/hero.webp", "https://x.com/b.js"]
        );

        let config = test_parse_config(&format!("{content}[images]\nlazyload = true\n"));
        assert_eq!(
            preload_candidates(&config),
            vec!["https://x.com/a.css", "https://x.com/b.js"]
        );
    }

    #[test]
    fn test_inject_preload() {
        let config = test_parse_config("[hints]\npreload = \"not a url, https://x.com/a.css\"");
        let html = "<head><title>t</title><link rel=\"icon\" href=\"/i.png\"></head>";
        assert_eq!(
            inject_preload(html, &config),
            "<head><title>t</title><link rel=\"preload\" href=\"https://x.com/a.css\" as=\"style\">\
             <link rel=\"icon\" href=\"/i.png\"></head>"
        );
    }

    #[test]
    fn test_inject_preload_without_anchor() {
        let config = test_parse_config("[hints]\npreload = \"https://x.com/a.css\"");
        let html = "<head></head>";
        assert!(matches!(inject_preload(html, &config), Cow::Borrowed(_)));
    }
}
