//! Shared string-level helpers.

pub mod html;
pub mod mime;
