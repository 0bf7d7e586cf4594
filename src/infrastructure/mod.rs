//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod cache;
pub mod di;
pub mod error;
pub mod registry;
pub mod traits;
pub mod translation;

pub use cache::{FileCacheRegion, FileCacheStore, MemoryCacheRegion, MemoryCacheStore};
pub use error::{InfraError, InfraResult};
pub use registry::{CatalogRegistry, ResourceResolver};
pub use translation::CatalogTranslator;
