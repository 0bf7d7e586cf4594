//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::{page_icons_region, PageIconsService, TreeRenderService};
use crate::config::{CacheBackend, Settings};
use crate::domain::{PageArena, PageRecord, PageTypeCatalog};
use crate::infrastructure::cache::{FileCacheStore, MemoryCacheStore};
use crate::infrastructure::registry::{CatalogRegistry, ResourceResolver};
use crate::infrastructure::traits::{
    CacheRegion, CacheStore, FileSystem, RealFileSystem, Translator,
};
use crate::infrastructure::translation::CatalogTranslator;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(serde::Deserialize)]
struct PagesFile {
    #[serde(default)]
    pages: Vec<PageRecord>,
}

/// Container holding shared collaborators and building services from them.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Cache store holding one icon stylesheet region per type universe
    pub cache: Arc<dyn CacheStore>,

    /// Translation lookup
    pub translator: Arc<dyn Translator>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let cache: Arc<dyn CacheStore> = match settings.cache_backend {
            CacheBackend::File => Arc::new(FileCacheStore::new(settings.cache_dir.clone())),
            CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
        };
        let translator = Arc::new(CatalogTranslator::new(settings.translations.clone()));
        Self::with_deps(settings, Arc::new(RealFileSystem), cache, translator)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cache: Arc<dyn CacheStore>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cache,
            translator,
        }
    }

    /// Read a page type catalog (TOML) and wrap it as a registry.
    pub fn load_registry(&self, path: &Path) -> InfraResult<Arc<CatalogRegistry>> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read page types {}", path.display()), e))?;
        let catalog = PageTypeCatalog::parse(&content)?;
        let resources = ResourceResolver::new(
            self.settings.resources_url.clone(),
            self.settings.resources_dir.clone(),
            Arc::clone(&self.fs),
        );
        Ok(Arc::new(CatalogRegistry::new(catalog, resources)))
    }

    /// Read pages (TOML `[[pages]]`) into a hierarchy annotated with type information.
    pub fn load_pages(&self, path: &Path, registry: &CatalogRegistry) -> InfraResult<PageArena> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read pages {}", path.display()), e))?;
        let file: PagesFile = toml::from_str(&content).map_err(|e| {
            InfraError::io(
                format!("parse pages {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
            )
        })?;
        let mut tree = PageArena::from_records(file.pages)?;
        tree.annotate(|page| registry.annotate_page(page));
        Ok(tree)
    }

    /// Name of the icon stylesheet region for a catalog under the current settings.
    pub fn icon_region_name(&self, registry: &CatalogRegistry) -> String {
        page_icons_region(&registry.fingerprint(&self.settings.base_type))
    }

    /// Icon stylesheet region scoped to a catalog and the current settings.
    pub fn icon_cache(&self, registry: &CatalogRegistry) -> Arc<dyn CacheRegion> {
        self.cache.region(&self.icon_region_name(registry))
    }

    pub fn icons_service(&self, registry: Arc<CatalogRegistry>) -> PageIconsService {
        PageIconsService::new(
            self.icon_cache(&registry),
            registry.clone(),
            registry,
            self.settings.base_type.clone(),
        )
    }

    pub fn tree_service(&self) -> TreeRenderService {
        TreeRenderService::new(Arc::clone(&self.translator))
    }
}
