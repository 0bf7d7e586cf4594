//! Admin tree node classification and page type icon stylesheets.
//!
//! - [`application::TreeNodeView`] computes the CSS classes, title and
//!   markup of one node in the content tree.
//! - [`application::services::PageIconsService`] builds the stylesheet mapping
//!   page types to icons and memoizes it in a cache region.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
