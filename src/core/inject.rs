//! Anchor-based markup injection.

use std::borrow::Cow;

/// Splice `payload` immediately before the first occurrence of `anchor`.
///
/// The anchor itself is kept. When `anchor` is absent (or empty) the input
/// comes back untouched, without allocating.
///
/// # Example
/// ```ignore
/// inject("<meta>", "<head><link></head>", "<link") // -> "<head><meta><link></head>"
/// ```
pub fn inject<'a>(payload: &str, html: &'a str, anchor: &str) -> Cow<'a, str> {
    if payload.is_empty() || anchor.is_empty() {
        return Cow::Borrowed(html);
    }

    // `find` yields a byte offset on a char boundary, so slicing is safe
    // even when the document carries multi-byte text.
    let Some(pos) = html.find(anchor) else {
        return Cow::Borrowed(html);
    };

    let mut out = String::with_capacity(html.len() + payload.len());
    out.push_str(&html[..pos]);
    out.push_str(payload);
    out.push_str(&html[pos..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_first_anchor() {
        let html = "<head><link a><link b></head>";
        assert_eq!(inject("<x>", html, "<link"), "<head><x><link a><link b></head>");
    }

    #[test]
    fn test_inject_missing_anchor_is_identity() {
        let html = "<html><head></head></html>";
        let out = inject("<x>", html, "<link");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, html);
    }

    #[test]
    fn test_inject_empty_payload_or_anchor() {
        assert!(matches!(inject("", "<link>", "<link"), Cow::Borrowed(_)));
        assert!(matches!(inject("<x>", "<link>", ""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_inject_multibyte() {
        let html = "<title>Ünïcødé 日本</title></head>";
        assert_eq!(
            inject("<script></script>", html, "</head>"),
            "<title>Ünïcødé 日本</title><script></script></head>"
        );
    }
}
