//! Catalog-backed type registry and icon resource resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::catalog::{ICON, SINGULAR_NAME};
use crate::domain::{PageRecord, PageTypeCatalog, TreeEntity};
use crate::infrastructure::traits::{FileSystem, TypeConfig, TypeRegistry};

/// Turns icon config values into URLs.
///
/// - `data:image/...`, `http(s)://...` and absolute `/...` values pass through
/// - relative values are served below `base_url`
/// - with a `resources_dir`, relative values whose file is missing resolve to nothing
pub struct ResourceResolver {
    base_url: String,
    resources_dir: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl ResourceResolver {
    pub fn new(
        base_url: impl Into<String>,
        resources_dir: Option<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            resources_dir,
            fs,
        }
    }

    pub fn resolve(&self, icon: &str) -> Option<String> {
        if icon.is_empty() {
            return None;
        }
        if icon.starts_with("data:image/")
            || icon.starts_with("http://")
            || icon.starts_with("https://")
            || icon.starts_with('/')
        {
            return Some(icon.to_string());
        }
        if let Some(dir) = &self.resources_dir {
            let file = dir.join(Path::new(icon));
            if !self.fs.is_file(&file) {
                warn!("icon resource not found, skipping: {}", file.display());
                return None;
            }
        }
        Some(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            icon.trim_start_matches("./")
        ))
    }
}

/// [`TypeRegistry`] and [`TypeConfig`] over a [`PageTypeCatalog`].
pub struct CatalogRegistry {
    catalog: PageTypeCatalog,
    resources: ResourceResolver,
}

impl CatalogRegistry {
    pub fn new(catalog: PageTypeCatalog, resources: ResourceResolver) -> Self {
        Self { catalog, resources }
    }

    pub fn catalog(&self) -> &PageTypeCatalog {
        &self.catalog
    }

    /// Digest of everything the icon stylesheet for `base_type` depends on:
    /// the declared hierarchy, icon settings and resource resolution.
    pub fn fingerprint(&self, base_type: &str) -> String {
        let mut hasher = Sha256::new();
        let mut field = |value: Option<&str>| {
            hasher.update(value.unwrap_or("").as_bytes());
            hasher.update([0u8]);
        };
        field(Some(base_type));
        field(Some(self.resources.base_url.as_str()));
        let dir = self
            .resources
            .resources_dir
            .as_ref()
            .map(|d| d.to_string_lossy().into_owned());
        field(dir.as_deref());
        for def in self.catalog.iter() {
            field(Some(def.name.as_str()));
            field(def.parent.as_deref());
            field(def.icon.as_deref());
            field(def.icon_class.as_deref());
        }
        hex::encode(hasher.finalize())
    }

    /// Resolved icon URL for a type (inherited `icon` config).
    pub fn icon_url(&self, type_name: &str) -> Option<String> {
        self.catalog
            .inherited(type_name, ICON)
            .and_then(|icon| self.resources.resolve(&icon))
    }

    /// Attach type-level information to a page.
    pub fn annotate_page(&self, page: &mut PageRecord) {
        if !self.catalog.contains(&page.type_name) {
            warn!(
                "page {} has unknown type {}, using defaults",
                page.id, page.type_name
            );
            return;
        }
        page.singular_name = self.catalog.inherited(&page.type_name, SINGULAR_NAME);
        page.can_have_children = self.catalog.can_have_children(&page.type_name);
        page.icon_url = self.icon_url(&page.type_name);
    }
}

impl TypeRegistry for CatalogRegistry {
    fn subclasses_for(&self, base: &str) -> Vec<String> {
        self.catalog.subclasses_for(base).unwrap_or_else(|e| {
            debug!("subclasses_for: {}", e);
            Vec::new()
        })
    }

    fn singleton(&self, type_name: &str) -> Option<Box<dyn TreeEntity>> {
        if !self.catalog.contains(type_name) {
            return None;
        }
        let mut prototype = PageRecord::prototype(type_name);
        self.annotate_page(&mut prototype);
        Some(Box::new(prototype))
    }
}

impl TypeConfig for CatalogRegistry {
    fn uninherited(&self, type_name: &str, key: &str) -> Option<String> {
        self.catalog.uninherited(type_name, key)
    }

    fn inherited(&self, type_name: &str, key: &str) -> Option<String> {
        self.catalog.inherited(type_name, key)
    }
}
