//! `[fonts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [fonts]
//! mode = "aggregate-deferred"   # or a legacy numeric code, e.g. 5
//! anchor = "<link"
//! display = "&display=swap"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// What to do with third-party font stylesheet references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ModeValue", into = "&'static str")]
pub enum FontMode {
    /// Leave the page alone.
    #[default]
    Keep,
    /// Remove every font stylesheet reference.
    Remove,
    /// Combine all references into one render-blocking stylesheet link.
    AggregateBlocking,
    /// Combine all families into a web font loader configuration.
    AggregateAsyncLoader,
    /// Combine all references into one non-blocking stylesheet link.
    AggregateDeferred,
}

impl FontMode {
    const NAMES: [&'static str; 5] = [
        "keep",
        "remove",
        "aggregate-blocking",
        "aggregate-async-loader",
        "aggregate-deferred",
    ];

    /// Map a legacy numeric option code (1..=5) to a mode.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Keep),
            2 => Some(Self::Remove),
            3 => Some(Self::AggregateBlocking),
            4 => Some(Self::AggregateAsyncLoader),
            5 => Some(Self::AggregateDeferred),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Whether the rewriter touches the page at all.
    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Keep)
    }
}

impl From<FontMode> for &'static str {
    fn from(mode: FontMode) -> Self {
        mode.as_str()
    }
}

/// Raw TOML value for [`FontMode`]: a name or a legacy code.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModeValue {
    Code(u8),
    Name(String),
}

impl TryFrom<ModeValue> for FontMode {
    type Error = String;

    fn try_from(value: ModeValue) -> Result<Self, Self::Error> {
        match value {
            ModeValue::Code(code) => {
                Self::from_code(code).ok_or_else(|| format!("unknown font mode code {code}"))
            }
            ModeValue::Name(name) => Self::NAMES
                .iter()
                .position(|n| *n == name)
                .and_then(|i| Self::from_code(i as u8 + 1))
                .ok_or_else(|| {
                    format!("unknown font mode `{name}`, expected one of: {}", Self::NAMES.join(", "))
                }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Rewriting policy.
    pub mode: FontMode,
    /// Replacement markup goes right before the first occurrence of this.
    pub anchor: String,
    /// Appended to the aggregated family string unless it has `display=`.
    pub display: String,
    /// Replaces the aggregated family string entirely.
    pub family: Option<String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            mode: FontMode::Keep,
            anchor: "<link".into(),
            display: "&display=swap".into(),
            family: None,
        }
    }
}

impl FontsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.anchor.is_empty() {
            diag.error_with_hint(
                FieldPath::new("fonts.anchor"),
                "injection anchor must not be empty",
                "the default is \"<link\"",
            );
        }
        if self.display.contains('"') {
            diag.error(FieldPath::new("fonts.display"), "must not contain `\"`");
        }
        if let Some(family) = &self.family
            && family.contains('"')
        {
            diag.error(FieldPath::new("fonts.family"), "must not contain `\"`");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.fonts.mode, FontMode::Keep);
        assert_eq!(config.fonts.anchor, "<link");
        assert_eq!(config.fonts.display, "&display=swap");
        assert!(config.fonts.family.is_none());
    }

    #[test]
    fn test_mode_by_name() {
        let config = test_parse_config("[fonts]\nmode = \"aggregate-async-loader\"");
        assert_eq!(config.fonts.mode, FontMode::AggregateAsyncLoader);
    }

    #[test]
    fn test_mode_by_code() {
        for (code, mode) in [
            (1, FontMode::Keep),
            (2, FontMode::Remove),
            (3, FontMode::AggregateBlocking),
            (4, FontMode::AggregateAsyncLoader),
            (5, FontMode::AggregateDeferred),
        ] {
            let config = test_parse_config(&format!("[fonts]\nmode = {code}"));
            assert_eq!(config.fonts.mode, mode);
        }
    }

    #[test]
    fn test_mode_invalid() {
        let content = "[fonts]\nmode = \"inline\"";
        assert!(toml::from_str::<crate::config::PagetuneConfig>(content).is_err());
        let content = "[fonts]\nmode = 9";
        assert!(toml::from_str::<crate::config::PagetuneConfig>(content).is_err());
    }

    #[test]
    fn test_mode_serializes_as_name() {
        let value = toml::Value::try_from(FontsConfig {
            mode: FontMode::AggregateDeferred,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value["mode"].as_str(), Some("aggregate-deferred"));
    }

    #[test]
    fn test_validate() {
        let config = test_parse_config("[fonts]\nanchor = \"\"\nfamily = 'x\"y'");
        let mut diag = ConfigDiagnostics::new();
        config.fonts.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
