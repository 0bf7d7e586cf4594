//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (CacheRegion, TypeRegistry, etc.)
//! but are themselves concrete structs, not traits.

mod icons;
mod tree;

pub use icons::{
    icon_rule, page_icons_region, PageIconsService, CSS_CACHE_KEY, PAGE_ICONS_CACHE_REGION,
    PAGE_ICONS_ID,
};
pub use tree::{TreeRenderOptions, TreeRenderService};
