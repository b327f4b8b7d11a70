//! Application use cases / business logic

pub mod fetch;
pub mod pages;
pub mod regenerate;
pub mod sitemap;

pub use fetch::ContentFetcher;
pub use pages::{DetailPage, ListPage, ListState, Page, PageBuilder, PageConfig, Route, TagChip};
pub use regenerate::{
    CacheEntry, CacheStatus, DEFAULT_REVALIDATE, PageStatus, RenderedPage, ServedPage, SiteError,
    StaticSite,
};
pub use sitemap::SitemapGenerator;
