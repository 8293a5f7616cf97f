//! MIME type and request destination detection for preloaded resources.
//!
//! Maps a file extension to the `as` destination of `<link rel="preload">`
//! and, for fonts, the MIME type browsers need to match the request.

/// Font MIME type constants.
pub mod types {
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
    pub const EOT: &str = "application/vnd.ms-fontobject";
}

/// Request destination of a preloaded resource (`as` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Style,
    Script,
    Font,
    Image,
    Other,
}

impl Destination {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Script => "script",
            Self::Font => "font",
            Self::Image => "image",
            Self::Other => "other",
        }
    }
}

/// Extension of the last path segment, lowercased, query string removed.
///
/// `https://x.com/a.EOT?v=2` -> `Some("eot")`, `https://x.com/dir/` -> `None`
pub fn extension_of(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = segment.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Guess preload destination from a (lowercase) file extension.
pub fn destination(ext: Option<&str>) -> Destination {
    match ext {
        Some("css") => Destination::Style,
        Some("js") => Destination::Script,
        Some("woff" | "woff2" | "ttf" | "eot" | "otf") => Destination::Font,
        Some("jpeg" | "jpg" | "webp" | "png" | "gif" | "svg") => Destination::Image,
        _ => Destination::Other,
    }
}

/// MIME type for a font extension.
pub fn font_type(ext: &str) -> Option<&'static str> {
    match ext {
        "woff" => Some(types::WOFF),
        "woff2" => Some(types::WOFF2),
        "ttf" => Some(types::TTF),
        "otf" => Some(types::OTF),
        "eot" => Some(types::EOT),
        _ => None,
    }
}
