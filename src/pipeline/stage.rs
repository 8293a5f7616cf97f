//! Built-in stages.

use std::borrow::Cow;

use super::Stage;
use crate::assets::strip_version_queries;
use crate::config::PagetuneConfig;
use crate::fonts::{FontRewriter, STYLESHEET_HOST};
use crate::hints::{inject_preconnect, inject_preload, strip_dns_prefetch_tags};
use crate::speculation::{SpeculationRuleBuilder, inject_rules};

/// Run `f` over `html`, reusing the input buffer when nothing changed.
fn rewrite_with(html: String, f: impl FnOnce(&str) -> Cow<'_, str>) -> String {
    let changed = match f(&html) {
        Cow::Borrowed(_) => None,
        Cow::Owned(out) => Some(out),
    };
    changed.unwrap_or(html)
}

/// Removes `ver`/`v` query arguments from script and stylesheet URLs.
pub struct VersionQueryStage;

impl Stage for VersionQueryStage {
    fn name(&self) -> &'static str {
        "version-query"
    }

    fn apply(&self, html: String, _config: &PagetuneConfig) -> String {
        rewrite_with(html, strip_version_queries)
    }
}

/// Rewrites font stylesheet references.
pub struct FontStage;

impl Stage for FontStage {
    fn name(&self) -> &'static str {
        "fonts"
    }

    fn apply(&self, html: String, config: &PagetuneConfig) -> String {
        let rewriter = FontRewriter::new(&config.fonts);
        rewrite_with(html, |html| rewriter.rewrite(html))
    }
}

/// Drops `dns-prefetch` hints for the font stylesheet host.
pub struct DnsPrefetchStage;

impl Stage for DnsPrefetchStage {
    fn name(&self) -> &'static str {
        "dns-prefetch"
    }

    fn apply(&self, html: String, _config: &PagetuneConfig) -> String {
        rewrite_with(html, |html| strip_dns_prefetch_tags(html, STYLESHEET_HOST))
    }
}

pub struct PreconnectStage;

impl Stage for PreconnectStage {
    fn name(&self) -> &'static str {
        "preconnect"
    }

    fn apply(&self, html: String, config: &PagetuneConfig) -> String {
        rewrite_with(html, |html| inject_preconnect(html, config))
    }
}

pub struct PreloadStage;

impl Stage for PreloadStage {
    fn name(&self) -> &'static str {
        "preload"
    }

    fn apply(&self, html: String, config: &PagetuneConfig) -> String {
        rewrite_with(html, |html| inject_preload(html, config))
    }
}

/// Appends the speculation rules script to the body.
///
/// The builder is prepared once, the prefixes do not change between pages.
pub struct SpeculationStage {
    builder: SpeculationRuleBuilder,
}

impl SpeculationStage {
    pub fn new(builder: SpeculationRuleBuilder) -> Self {
        Self { builder }
    }
}

impl Stage for SpeculationStage {
    fn name(&self) -> &'static str {
        "speculation"
    }

    fn apply(&self, html: String, _config: &PagetuneConfig) -> String {
        rewrite_with(html, |html| inject_rules(html, &self.builder))
    }
}
