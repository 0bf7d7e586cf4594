//! Error conversion helpers for cache store operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add cache region/key context to a cache store error.
    ///
    /// # Example
    /// ```ignore
    /// cache.get(CSS_CACHE_KEY)
    ///     .with_cache_context("read", cache.name(), CSS_CACHE_KEY)?;
    /// ```
    fn with_cache_context(self, action: &str, region: &str, key: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_cache_context(self, action: &str, region: &str, key: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Cache {
            context: format!("{} {}/{}", action, region, key),
            source: e,
        })
    }
}
