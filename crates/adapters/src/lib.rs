//! folio adapters crate
//!
//! Infrastructure adapters implementing the domain ports:
//! - `cms`: Wisp HTTP client and an offline stub
//! - `cache`: Bounded in-memory page cache
//! - `templates`: Askama page and sitemap templates

mod cache_memory;
pub mod cms;
pub mod templates;

/// Re-exports for cache adapters
pub mod cache {
    pub use crate::cache_memory::{DEFAULT_MAX_ENTRIES, InMemoryPageCache};
}

pub use templates::AskamaPages;
