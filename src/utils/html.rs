//! HTML utility functions.
//!
//! Provides the string-level HTML helpers the rewriting stages share:
//! - `escape_attr()`, `unescape()` - HTML entity handling
//! - `strip_comments()` - drop `<!-- ... -->` blocks from a working copy
//! - `start_tags()` - streaming scan for start tags of one element name
//!
//! The scanner never builds a DOM. Stages work on byte offsets of the
//! source document so everything outside a matched tag survives
//! byte-for-byte.

use std::borrow::Cow;
use std::ops::Range;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML attribute values.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles the named entities that show up in attribute values
/// and numeric character references (`&#038;`, `&#x26;`).
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        // Entities are short; anything longer is literal text
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push('&');
                rest = tail;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

// =============================================================================
// Comments
// =============================================================================

/// Remove every complete `<!-- ... -->` block.
///
/// Each comment ends at the first `-->` after its opener. An unterminated
/// comment is left in place along with everything after it.
pub fn strip_comments(html: &str) -> Cow<'_, str> {
    if !html.contains("<!--") {
        return Cow::Borrowed(html);
    }

    let mut result = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<!--") {
        let Some(len) = rest[start + 4..].find("-->") else {
            break;
        };
        result.push_str(&rest[..start]);
        rest = &rest[start + 4 + len + 3..];
    }
    result.push_str(rest);

    Cow::Owned(result)
}

// =============================================================================
// Start Tag Scanning
// =============================================================================

/// A start tag located by [`start_tags`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    /// Byte range of the tag in the scanned source, `<` through `>`.
    pub span: Range<usize>,
    /// The tag text exactly as written.
    pub raw: &'a str,
    /// Attributes in source order. Names are lowercased, values are raw
    /// (entities not decoded).
    pub attrs: Vec<(String, &'a str)>,
}

impl<'a> StartTag<'a> {
    /// Raw value of the first attribute called `name` (ASCII case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Whether the space-separated `rel` attribute contains `token`.
    pub fn has_rel(&self, token: &str) -> bool {
        self.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }
}

/// Iterate over well-formed start tags named `name` in `html`.
///
/// Matching is ASCII case-insensitive on the element name and tolerates
/// any attribute order. A candidate whose attribute list is malformed
/// (unterminated quote, `<` inside a quoted value, stray quote in a name
/// or unquoted value) is skipped as a whole; nothing is partially
/// extracted from it.
pub fn start_tags<'a>(html: &'a str, name: &'static str) -> StartTags<'a> {
    StartTags { html, name, pos: 0 }
}

/// Iterator returned by [`start_tags`].
pub struct StartTags<'a> {
    html: &'a str,
    name: &'static str,
    pos: usize,
}

impl<'a> Iterator for StartTags<'a> {
    type Item = StartTag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.html.as_bytes();
        let name = self.name.as_bytes();

        while let Some(offset) = self.html[self.pos..].find('<') {
            let start = self.pos + offset;
            self.pos = start + 1;

            let name_end = start + 1 + name.len();
            let is_candidate = bytes.len() > name_end
                && bytes[start + 1..name_end].eq_ignore_ascii_case(name)
                && matches!(bytes[name_end], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c');
            if !is_candidate {
                continue;
            }

            if let Some((end, attrs)) = parse_tag_body(self.html, name_end) {
                self.pos = end;
                return Some(StartTag {
                    span: start..end,
                    raw: &self.html[start..end],
                    attrs,
                });
            }
        }

        self.pos = self.html.len();
        None
    }
}

/// Parse attributes from `from` up to the closing `>`.
///
/// Returns the byte offset just past `>` and the attribute list, or `None`
/// if the tag is malformed.
fn parse_tag_body(html: &str, from: usize) -> Option<(usize, Vec<(String, &str)>)> {
    let bytes = html.as_bytes();
    let mut attrs = Vec::new();
    let mut i = from;

    loop {
        // Skip whitespace and self-closing slashes between attributes
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => return Some((i + 1, attrs)),
            b'<' | b'"' | b'\'' | b'=' => return None,
            _ => {}
        }

        // Attribute name
        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            if matches!(bytes[i], b'<' | b'"' | b'\'') {
                return None;
            }
            i += 1;
        }
        let attr_name = html[name_start..i].to_ascii_lowercase();

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes.get(j) != Some(&b'=') {
            // Boolean attribute
            attrs.push((attr_name, ""));
            continue;
        }

        i = j + 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match *bytes.get(i)? {
            quote @ (b'"' | b'\'') => {
                let value_start = i + 1;
                let len = html[value_start..].find(quote as char)?;
                let value = &html[value_start..value_start + len];
                if value.contains('<') {
                    return None;
                }
                i = value_start + len + 1;
                value
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    if matches!(bytes[i], b'"' | b'\'' | b'<' | b'`') {
                        return None;
                    }
                    i += 1;
                }
                &html[value_start..i]
            }
        };
        attrs.push((attr_name, value));
    }
}

// =============================================================================
// Tests
// =============================================================================
