//! `[assets]` section configuration.

use serde::{Deserialize, Serialize};

/// Script and stylesheet URL cleanup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Remove `ver` / `v` cache-busting query arguments from
    /// `<script src>` and stylesheet `<link href>` URLs.
    pub remove_version_query: bool,
}
