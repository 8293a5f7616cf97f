//! Font stylesheet rewriting.
//!
//! Collects every third-party font stylesheet `<link>` in a page, removes
//! them, and depending on [`FontMode`] puts back one aggregated link, a web
//! font loader, or nothing.
//!
//! ```text
//! html ─► collect_references ─► remove raw tags ─► synthesize ─► inject at anchor
//! ```

mod extract;
mod markup;

pub use extract::{
    AGGREGATED_ID, FontReference, QuerySyntax, STYLESHEET_HOST, collect_references,
    stylesheet_syntax,
};
pub use markup::{LOADER_SRC, aggregate_link, async_loader, family_query, loader_families};

use std::borrow::Cow;

use crate::config::{FONT_CDN_ORIGIN, FontMode, FontsConfig};
use crate::core::inject;
use crate::debug;

/// Closing head marker the loader bootstrap is placed before.
const HEAD_END: &str = "</head>";

/// Origins the browser will contact once fonts are rewritten under `mode`.
pub fn implied_preconnect_origins(mode: FontMode) -> &'static [&'static str] {
    match mode {
        FontMode::Keep | FontMode::Remove => &[],
        FontMode::AggregateBlocking | FontMode::AggregateDeferred => &[FONT_CDN_ORIGIN],
        FontMode::AggregateAsyncLoader => &[
            FONT_CDN_ORIGIN,
            "https://ajax.googleapis.com",
            "https://fonts.googleapis.com",
        ],
    }
}

/// Rewrites font stylesheet references according to a [`FontsConfig`].
#[derive(Debug, Clone, Copy)]
pub struct FontRewriter<'c> {
    config: &'c FontsConfig,
}

impl<'c> FontRewriter<'c> {
    pub fn new(config: &'c FontsConfig) -> Self {
        Self { config }
    }

    /// Rewrite `html`. Returns the input untouched when the mode is `keep`
    /// or the page has no font references.
    pub fn rewrite<'h>(&self, html: &'h str) -> Cow<'h, str> {
        let mode = self.config.mode;
        if !mode.is_active() {
            return Cow::Borrowed(html);
        }

        let refs = collect_references(html);
        if refs.is_empty() {
            return Cow::Borrowed(html);
        }
        debug!("fonts"; "collected {} font reference(s)", refs.len());

        let mut working = html.to_string();
        for reference in &refs {
            working = working.replace(&reference.raw_tag, "");
        }

        let anchor = &self.config.anchor;
        let output = match mode {
            FontMode::Keep | FontMode::Remove => working,
            FontMode::AggregateBlocking => {
                inject(&aggregate_link(&refs, self.config, false), &working, anchor).into_owned()
            }
            FontMode::AggregateDeferred => {
                inject(&aggregate_link(&refs, self.config, true), &working, anchor).into_owned()
            }
            FontMode::AggregateAsyncLoader => {
                let (config_script, loader) = async_loader(&refs);
                let with_loader = inject(&loader, &working, HEAD_END);
                if matches!(with_loader, Cow::Borrowed(_)) {
                    debug!("fonts"; "no {} in page, loader dropped", HEAD_END);
                }
                inject(&config_script, &with_loader, anchor).into_owned()
            }
        };

        Cow::Owned(output)
    }
}
