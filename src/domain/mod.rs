//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod html;

pub use arena::{PageArena, PageNode};
pub use catalog::{PageTypeCatalog, PageTypeDef};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use html::{escape_html, html_id};
