//! folio domain crate
//!
//! Core blog pipeline, following hexagonal architecture:
//! - `model`: Posts, tags, comments and query value objects
//! - `ports`: Trait definitions for the CMS, page cache, templates and clock
//! - `usecases`: Content fetching, page building, regeneration and sitemap
//! - `policy`: Derived-content rules (reading time)

pub mod model;
pub mod policy;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
