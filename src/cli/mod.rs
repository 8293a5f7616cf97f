//! Command-line host: loads the config and drives the pipeline.

pub mod args;
pub mod optimize;
pub mod rules;

pub use args::{Cli, Commands};
