//! Cache region and store implementations
//!
//! - [`MemoryCacheRegion`]: lives as long as the process
//! - [`FileCacheRegion`]: one file per key below `<cache_dir>/<region>`
//! - [`MemoryCacheStore`], [`FileCacheStore`]: hand out regions by name

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::infrastructure::traits::{CacheRegion, CacheStore};

/// In-memory cache region.
#[derive(Debug, Default)]
pub struct MemoryCacheRegion {
    name: String,
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCacheRegion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned<E>(_: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, "cache lock poisoned")
}

impl CacheRegion for MemoryCacheRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn has(&self, key: &str) -> io::Result<bool> {
        Ok(self.entries.read().map_err(poisoned)?.contains_key(key))
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.entries.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

/// File-backed cache region.
///
/// Keys are hashed to file names. Writes go through a temp file in the
/// region directory followed by a rename, so readers never see partial values.
#[derive(Debug, Clone)]
pub struct FileCacheRegion {
    name: String,
    dir: PathBuf,
}

impl FileCacheRegion {
    /// Region `name` stored below `cache_dir/name`.
    pub fn new(cache_dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = cache_dir.join(&name);
        Self { name, dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(hex::encode(hasher.finalize()))
    }
}

impl CacheRegion for FileCacheRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn has(&self, key: &str) -> io::Result<bool> {
        match std::fs::metadata(self.entry_path(key)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(level = "debug", skip(self, value), fields(region = %self.name))]
    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        debug!("stored {} bytes", value.len());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Store of in-memory regions; a region lives as long as the store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    regions: RwLock<HashMap<String, Arc<MemoryCacheRegion>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn region(&self, name: &str) -> Arc<dyn CacheRegion> {
        if let Some(region) = self
            .regions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return region.clone();
        }
        self.regions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCacheRegion::new(name)))
            .clone()
    }

    fn clear_all(&self) -> io::Result<()> {
        self.regions.write().map_err(poisoned)?.clear();
        Ok(())
    }

    fn location(&self, _name: Option<&str>) -> Option<PathBuf> {
        None
    }
}

/// Store of file-backed regions below one root directory.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    root: PathBuf,
}

impl FileCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CacheStore for FileCacheStore {
    fn region(&self, name: &str) -> Arc<dyn CacheRegion> {
        Arc::new(FileCacheRegion::new(&self.root, name))
    }

    fn clear_all(&self) -> io::Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn location(&self, name: Option<&str>) -> Option<PathBuf> {
        Some(match name {
            Some(name) => self.root.join(name),
            None => self.root.clone(),
        })
    }
}
