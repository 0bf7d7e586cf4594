//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the content model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown child count method: {0}")]
    UnknownChildCountMethod(String),

    #[error("unknown page type: {0}")]
    UnknownPageType(String),

    #[error("invalid page type catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("duplicate page id: {0}")]
    DuplicatePage(u64),

    #[error("page {id} references unknown parent {parent}")]
    OrphanPage { id: u64, parent: u64 },

    #[error("cycle detected in page hierarchy at page: {0}")]
    CycleDetected(u64),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
