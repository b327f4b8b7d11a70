//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{
    Comment, CommentsQuery, Limit, Post, PostsQuery, RelatedPostsQuery, SitemapEntry, Tag,
};
use crate::usecases::pages::Page;
use crate::usecases::regenerate::{CacheEntry, RenderedPage};

/// Error type for CMS operations
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for the headless CMS holding posts, tags and comments.
///
/// Read-only. Implementations do not retry or cache; every failure is
/// returned to the caller.
#[async_trait]
pub trait CmsClient: Send + Sync {
    /// Fetch a single post; `Ok(None)` when the CMS has no post for the slug
    async fn get_post(&self, slug: &str) -> Result<Option<Post>, CmsError>;

    /// List posts, newest first
    async fn get_posts(&self, query: &PostsQuery) -> Result<Vec<Post>, CmsError>;

    /// List tags
    async fn get_tags(&self, page: u32, limit: Limit) -> Result<Vec<Tag>, CmsError>;

    /// Posts the CMS considers similar to the given one
    async fn get_related_posts(&self, query: &RelatedPostsQuery) -> Result<Vec<Post>, CmsError>;

    /// Comments attached to a post
    async fn get_comments(&self, query: &CommentsQuery) -> Result<Vec<Comment>, CmsError>;
}

/// Error type for page cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Port for storing rendered pages between regenerations
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Look up a cached page, fresh or not
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<RenderedPage>>, CacheError>;

    /// Store (or replace) a cached page
    async fn put(&self, key: &str, entry: CacheEntry<RenderedPage>) -> Result<(), CacheError>;
}

/// Error type for template rendering
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template rendering failed: {0}")]
    Render(String),
}

/// Port for turning page views into markup
pub trait PageTemplate: Send + Sync {
    /// Render a list, detail or not-found page
    fn render_page(&self, page: &Page) -> Result<String, TemplateError>;

    /// Render sitemap entries as XML
    fn render_sitemap(&self, entries: &[SitemapEntry]) -> Result<String, TemplateError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
