//! Time-based regeneration of rendered pages
//!
//! Rendered output is stored with the time it was produced and a TTL. A
//! request for a route whose entry is still fresh is served from the cache;
//! otherwise the page is rebuilt from the CMS, rendered and stored again.

use std::sync::Arc;
use time::{Duration, OffsetDateTime};

use crate::ports::{CmsClient, Clock, PageCache, PageTemplate, TemplateError};
use crate::usecases::pages::{PageBuilder, Route};

/// Default staleness window
pub const DEFAULT_REVALIDATE: Duration = Duration::hours(1);

/// A cached value with the time it was produced and how long it stays fresh
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub rendered_at: OffsetDateTime,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, rendered_at: OffsetDateTime, ttl: Duration) -> Self {
        Self {
            value,
            rendered_at,
            ttl,
        }
    }

    /// `None` when `rendered_at + ttl` lies beyond the representable range
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.rendered_at.checked_add(self.ttl)
    }

    /// Fresh strictly before `rendered_at + ttl`; an entry whose expiry
    /// overflows never expires
    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        self.expires_at().is_none_or(|expires_at| now < expires_at)
    }
}

/// HTTP-level outcome of a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub status: PageStatus,
    pub body: String,
}

/// How a served page relates to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a fresh entry
    Hit,
    /// No entry existed
    Miss,
    /// An expired entry was regenerated
    Stale,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServedPage {
    pub page: RenderedPage,
    pub rendered_at: OffsetDateTime,
    pub cache: CacheStatus,
}

/// Errors from serving a page
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Serves rendered pages, regenerating them once their TTL has elapsed
pub struct StaticSite<C, T, K, Cl>
where
    C: CmsClient + ?Sized,
    T: PageTemplate + ?Sized,
    K: PageCache + ?Sized,
    Cl: Clock + ?Sized,
{
    builder: PageBuilder<C>,
    templates: Arc<T>,
    cache: Arc<K>,
    clock: Arc<Cl>,
    ttl: Duration,
}

impl<C, T, K, Cl> StaticSite<C, T, K, Cl>
where
    C: CmsClient + ?Sized,
    T: PageTemplate + ?Sized,
    K: PageCache + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(
        builder: PageBuilder<C>,
        templates: Arc<T>,
        cache: Arc<K>,
        clock: Arc<Cl>,
        ttl: Duration,
    ) -> Self {
        Self {
            builder,
            templates,
            cache,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serve a route from the cache, regenerating it if missing or expired.
    ///
    /// Cache backend failures are logged and bypassed. Degraded renders
    /// (after CMS failures) are cached like any other until they expire.
    pub async fn get(&self, route: &Route) -> Result<ServedPage, SiteError> {
        let key = route.cache_key();
        let now = self.clock.now();

        let status = match self.cache.get(&key).await {
            Ok(Some(entry)) if entry.is_fresh(now) => {
                tracing::debug!(key = %key, "Serving cached page");
                return Ok(ServedPage {
                    page: entry.value,
                    rendered_at: entry.rendered_at,
                    cache: CacheStatus::Hit,
                });
            }
            Ok(Some(_)) => CacheStatus::Stale,
            Ok(None) => CacheStatus::Miss,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Page cache read failed, rendering");
                CacheStatus::Miss
            }
        };

        let page = self.render(route).await?;
        let rendered_at = self.clock.now();

        tracing::info!(
            key = %key,
            cache = status.as_str(),
            not_found = page.status == PageStatus::NotFound,
            "Regenerated page"
        );

        let entry = CacheEntry::new(page.clone(), rendered_at, self.ttl);
        if let Err(e) = self.cache.put(&key, entry).await {
            tracing::warn!(key = %key, error = %e, "Page cache write failed");
        }

        Ok(ServedPage {
            page,
            rendered_at,
            cache: status,
        })
    }

    /// Build and render a route without touching the cache
    pub async fn render(&self, route: &Route) -> Result<RenderedPage, SiteError> {
        let page = self.builder.build(route).await;
        let body = self.templates.render_page(&page)?;
        let status = if page.is_not_found() {
            PageStatus::NotFound
        } else {
            PageStatus::Ok
        };
        Ok(RenderedPage { status, body })
    }
}
