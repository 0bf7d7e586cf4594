//! I/O boundary traits for testability
//!
//! These traits abstract external collaborators (filesystem, cache stores,
//! type registry, translations), allowing services to be tested with
//! mock implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::TreeEntity;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// One named region of a key/value cache store.
///
/// Failures of the underlying store surface as `io::Error`.
pub trait CacheRegion: Send + Sync {
    /// Region name, e.g. `SiteTree_PageIcons`.
    fn name(&self) -> &str;

    fn has(&self, key: &str) -> io::Result<bool>;

    /// Cached value, or `None` if the key is absent (or was evicted).
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Drop every entry in this region.
    fn clear(&self) -> io::Result<()>;
}

/// Cache store handing out named regions.
pub trait CacheStore: Send + Sync {
    /// Region `name`; repeated calls with the same name share entries.
    fn region(&self, name: &str) -> Arc<dyn CacheRegion>;

    /// Drop every region of the store.
    fn clear_all(&self) -> io::Result<()>;

    /// On-disk location of region `name`, or of the whole store for `None`.
    fn location(&self, name: Option<&str>) -> Option<PathBuf>;
}

/// Registry of known content types.
pub trait TypeRegistry: Send + Sync {
    /// `base` followed by all of its transitive subtypes, in a stable order.
    /// Unknown bases yield an empty list.
    fn subclasses_for(&self, base: &str) -> Vec<String>;

    /// Prototype instance used to answer per-type questions.
    fn singleton(&self, type_name: &str) -> Option<Box<dyn TreeEntity>>;
}

/// Per-type configuration lookup.
pub trait TypeConfig: Send + Sync {
    /// Value declared directly on `type_name`, ignoring ancestors.
    fn uninherited(&self, type_name: &str, key: &str) -> Option<String>;

    /// Value declared on `type_name` or inherited from the nearest ancestor.
    fn inherited(&self, type_name: &str, key: &str) -> Option<String>;
}

/// Translation lookup.
pub trait Translator: Send + Sync {
    /// Translated text for `key`, or `fallback` when there is none.
    fn translate(&self, key: &str, fallback: &str) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Translator that always answers with the fallback text.
#[derive(Debug, Default)]
pub struct FallbackTranslator;

impl Translator for FallbackTranslator {
    fn translate(&self, _key: &str, fallback: &str) -> String {
        fallback.to_string()
    }
}
