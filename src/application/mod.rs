//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod assets;
pub mod error;
pub mod error_ext;
pub mod services;
pub mod tree_node;

pub use assets::PageAssets;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use tree_node::{RenderRequest, TreeNodeView, PAGE_TYPE_FALLBACK, PAGE_TYPE_KEY};
