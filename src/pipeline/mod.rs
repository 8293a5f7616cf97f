//! Ordered HTML rewriting stages.
//!
//! Every page passes through the same fixed sequence. Stages that have
//! nothing to do under the current configuration are left out when the
//! pipeline is built.
//!
//! ```text
//! html ─► version-query ─► fonts ─► dns-prefetch ─► preconnect ─► preload ─► speculation ─► html
//! ```
//!
//! A pipeline is immutable once built and can be shared between threads:
//! pages are independent, each one gets its own buffers.

mod stage;

pub use stage::{
    DnsPrefetchStage, FontStage, PreconnectStage, PreloadStage, SpeculationStage,
    VersionQueryStage,
};

use crate::config::PagetuneConfig;
use crate::debug;
use crate::fonts::implied_preconnect_origins;
use crate::hints::preload_candidates;
use crate::speculation::SpeculationRuleBuilder;

/// One named transformation of a rendered page.
pub trait Stage: Send + Sync {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite `html`. Must return the input unchanged when there is
    /// nothing to do.
    fn apply(&self, html: String, config: &PagetuneConfig) -> String;
}

/// Stages in application order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn pipe(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append a stage only when `cond` holds.
    pub fn pipe_if(self, cond: bool, stage: impl Stage + 'static) -> Self {
        if cond { self.pipe(stage) } else { self }
    }

    /// Pipeline for `config`, in the fixed stage order.
    pub fn from_config(config: &PagetuneConfig) -> Self {
        let fonts = config.fonts.mode.is_active();
        let preconnect = !config.hints.preconnect_entries().is_empty()
            || !implied_preconnect_origins(config.fonts.mode).is_empty();
        let preload = !preload_candidates(config).is_empty();
        let speculation = config.speculation.enable;

        let pipeline = Self::new()
            .pipe_if(config.assets.remove_version_query, VersionQueryStage)
            .pipe_if(fonts, FontStage)
            .pipe_if(fonts, DnsPrefetchStage)
            .pipe_if(preconnect, PreconnectStage)
            .pipe_if(preload, PreloadStage);

        let pipeline = if speculation {
            pipeline.pipe(SpeculationStage::new(SpeculationRuleBuilder::from_config(config)))
        } else {
            pipeline
        };

        debug!("pipeline"; "stages: {}", pipeline.names().join(" -> "));
        pipeline
    }

    /// Names of the stages, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over `html`.
    pub fn run(&self, html: String, config: &PagetuneConfig) -> String {
        self.stages.iter().fold(html, |html, stage| {
            let before = html.len();
            let html = stage.apply(html, config);
            debug!("pipeline"; "{}: {} -> {} bytes", stage.name(), before, html.len());
            html
        })
    }
}
