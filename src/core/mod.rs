//! Core types - pure abstractions shared across the rewriting stages.

mod inject;
mod prefix;

pub use inject::inject;
pub use prefix::{PathPattern, PrefixError, ReferenceKind, UrlPatternPrefixer};
