//! Domain types shared across the stackscope crates.

pub mod collections;
pub mod dimension;
pub mod platform;
pub mod site;

pub use dimension::{Dimension, PageType, PageTypeFilter};
pub use platform::{Platform, PlatformLabel};
pub use site::{Detection, MetaTag, SiteRecord};
