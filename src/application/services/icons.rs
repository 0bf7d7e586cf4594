//! Page type icon stylesheet service
//!
//! Generates one stylesheet with a background-image rule per content type
//! and memoizes it in a cache region. The cached document is served as-is
//! until the region is flushed; it is never checked against the current
//! type configuration.
//!
//! Concurrent first requests may each build the stylesheet and write it.
//! The build is deterministic, so the duplicate writes are identical.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt, PageAssets};
use crate::domain::catalog::ICON_CLASS;
use crate::domain::html_id;
use crate::infrastructure::traits::{CacheRegion, TypeConfig, TypeRegistry};

/// Cache region holding the generated stylesheet, suffixed per type universe
/// by [`page_icons_region`].
pub const PAGE_ICONS_CACHE_REGION: &str = "SiteTree_PageIcons";
/// Key of the stylesheet inside [`PAGE_ICONS_CACHE_REGION`].
pub const CSS_CACHE_KEY: &str = "css";
/// Asset id the stylesheet is registered under.
pub const PAGE_ICONS_ID: &str = "PageIcons";

/// Region name for the stylesheet of one type universe.
///
/// `fingerprint` identifies the catalog and settings the stylesheet is built
/// from; its first 16 characters are used.
///
/// # Examples
/// ```
/// use cmstree::application::services::page_icons_region;
///
/// assert_eq!(page_icons_region("0123456789abcdef99"), "SiteTree_PageIcons_0123456789abcdef");
/// ```
pub fn page_icons_region(fingerprint: &str) -> String {
    let short: String = fingerprint.chars().take(16).collect();
    format!("{}_{}", PAGE_ICONS_CACHE_REGION, short)
}

/// CSS rule giving nodes of one type their icon.
///
/// Quotes and backslashes in the URL are escaped for the quoted `url()`.
///
/// # Examples
/// ```
/// use cmstree::application::services::icon_rule;
///
/// assert_eq!(
///     icon_rule("Article", "/icons/article.png"),
///     ".page-icon.class-Article, li.class-Article > a .jstree-pageicon \
///      { background: transparent url('/icons/article.png') 0 0 no-repeat; }"
/// );
/// ```
pub fn icon_rule(css_class: &str, icon_url: &str) -> String {
    format!(
        ".page-icon.class-{0}, li.class-{0} > a .jstree-pageicon \
         {{ background: transparent url('{1}') 0 0 no-repeat; }}",
        css_class,
        icon_url.replace('\\', "\\\\").replace('\'', "\\'")
    )
}

/// Service producing the page icon stylesheet.
pub struct PageIconsService {
    cache: Arc<dyn CacheRegion>,
    registry: Arc<dyn TypeRegistry>,
    config: Arc<dyn TypeConfig>,
    base_type: String,
}

impl PageIconsService {
    /// Create a new icon service for all subtypes of `base_type`.
    pub fn new(
        cache: Arc<dyn CacheRegion>,
        registry: Arc<dyn TypeRegistry>,
        config: Arc<dyn TypeConfig>,
        base_type: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            registry,
            config,
            base_type: base_type.into(),
        }
    }

    /// Stylesheet for all page types, from cache when present.
    #[instrument(level = "debug", skip(self), fields(region = %self.cache.name()))]
    pub fn generate_page_icons_css(&self) -> ApplicationResult<String> {
        let region = self.cache.name();
        if self
            .cache
            .has(CSS_CACHE_KEY)
            .with_cache_context("check", region, CSS_CACHE_KEY)?
        {
            if let Some(css) = self
                .cache
                .get(CSS_CACHE_KEY)
                .with_cache_context("read", region, CSS_CACHE_KEY)?
            {
                debug!("cache hit");
                return Ok(css);
            }
            debug!("entry evicted between check and read");
        }

        debug!("cache miss, building stylesheet");
        let css = self.build_css();
        self.cache
            .set(CSS_CACHE_KEY, &css)
            .with_cache_context("write", region, CSS_CACHE_KEY)?;
        Ok(css)
    }

    /// Build the stylesheet without consulting the cache.
    ///
    /// Types declaring their own `icon_class` are skipped; an `icon_class`
    /// inherited from an ancestor does not count. Types without an icon
    /// produce no rule.
    pub fn build_css(&self) -> String {
        let mut css = String::new();
        for type_name in self.registry.subclasses_for(&self.base_type) {
            if self
                .config
                .uninherited(&type_name, ICON_CLASS)
                .is_some_and(|c| !c.is_empty())
            {
                debug!("{}: own icon_class, skipped", type_name);
                continue;
            }
            let icon_url = self
                .registry
                .singleton(&type_name)
                .and_then(|prototype| prototype.icon_url())
                .filter(|url| !url.is_empty());
            match icon_url {
                Some(url) => css.push_str(&icon_rule(&html_id(&type_name), &url)),
                None => debug!("{}: no icon", type_name),
            }
        }
        css
    }

    /// Register the stylesheet with the page assets.
    pub fn init(&self, assets: &mut PageAssets) -> ApplicationResult<()> {
        let css = self.generate_page_icons_css()?;
        assets.custom_css(css, Some(PAGE_ICONS_ID));
        Ok(())
    }

    /// Drop the cached stylesheet.
    pub fn flush(&self) -> ApplicationResult<()> {
        self.cache
            .clear()
            .with_cache_context("clear", self.cache.name(), "*")?;
        info!("flushed cache region {}", self.cache.name());
        Ok(())
    }
}
