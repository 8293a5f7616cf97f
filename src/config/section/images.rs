//! `[images]` section configuration.

use serde::{Deserialize, Serialize};

/// Image features run by other parts of the host.
///
/// Per-content preloads are only merged in when neither is active, since
/// both features take over preloading of page images themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Image optimization (CDN rewriting) is active.
    pub optimize: bool,
    /// Image lazy-loading is active.
    pub lazyload: bool,
}

impl ImagesConfig {
    /// Whether either image feature is active.
    #[inline]
    pub fn any_active(&self) -> bool {
        self.optimize || self.lazyload
    }
}
