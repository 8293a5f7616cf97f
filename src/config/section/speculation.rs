//! `[speculation]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [speculation]
//! enable = true
//! mode = "prefetch"
//! eagerness = "conservative"
//! exclude = ["/cart/*", "/checkout/*"]
//! ```

use serde::{Deserialize, Serialize};

/// How eligible links are speculatively loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeculationMode {
    /// Fetch the document only.
    Prefetch,
    /// Fetch and render the document in the background.
    #[default]
    Prerender,
}

impl SpeculationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prefetch => "prefetch",
            Self::Prerender => "prerender",
        }
    }
}

/// When the browser should act on a matching link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eagerness {
    /// On pointer or touch down.
    Conservative,
    /// On hover.
    #[default]
    Moderate,
    /// As soon as there is any hint of navigation.
    Eager,
    /// As soon as the rule is seen.
    Immediate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeculationConfig {
    /// Emit speculation rules on every page.
    pub enable: bool,
    /// Prefetch or prerender.
    pub mode: SpeculationMode,
    /// Rule eagerness.
    pub eagerness: Eagerness,
    /// Additional path patterns to keep out of speculation, relative to the site.
    pub exclude: Vec<String>,
}
