//! Configuration section definitions.
//!
//! | Section         | Purpose                                        |
//! |-----------------|------------------------------------------------|
//! | `[site]`        | Site root and reference-kind base URLs         |
//! | `[fonts]`       | Font stylesheet rewriting policy               |
//! | `[hints]`       | Preconnect and preload resource hints          |
//! | `[images]`      | Image feature flags observed by preload        |
//! | `[speculation]` | Speculative navigation rules                   |
//! | `[assets]`      | Script/stylesheet URL cleanup                  |

mod assets;
mod fonts;
mod hints;
mod images;
mod site;
mod speculation;

pub use assets::AssetsConfig;
pub use fonts::{FontMode, FontsConfig};
pub use hints::{FONT_CDN_ORIGIN, HintsConfig};
pub use images::ImagesConfig;
pub use site::SiteConfig;
pub use speculation::{Eagerness, SpeculationConfig, SpeculationMode};
