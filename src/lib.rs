//! pagetune - rewrite rendered HTML for faster page loads.
//!
//! The library takes a rendered page and a [`PagetuneConfig`] and runs an
//! ordered [`Pipeline`] of stages over it:
//!
//! - [`fonts`]: collect font stylesheet links and aggregate or remove them
//! - [`hints`]: preconnect and preload hints
//! - [`speculation`]: speculation rules for same-site navigation
//! - [`assets`]: version query removal on script and stylesheet URLs
//!
//! # Example
//!
//! ```ignore
//! let config = PagetuneConfig::load(Path::new("pagetune.toml"))?;
//! let pipeline = Pipeline::from_config(&config);
//! let html = pipeline.run(html, &config);
//! ```

pub mod logger;

pub mod assets;
pub mod config;
pub mod core;
pub mod fonts;
pub mod hints;
pub mod pipeline;
pub mod speculation;
pub mod utils;

pub use config::PagetuneConfig;
pub use pipeline::{Pipeline, Stage};
