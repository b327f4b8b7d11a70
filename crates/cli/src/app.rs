//! Wiring of adapters into the site use cases

use anyhow::{Context, Result, bail};
use folio_adapters::cache::InMemoryPageCache;
use folio_adapters::cms::{StubCms, WispClient};
use folio_adapters::AskamaPages;
use folio_domain::usecases::{
    ContentFetcher, PageBuilder, PageConfig, SitemapGenerator, StaticSite,
};
use folio_domain::{CmsClient, SystemClock};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;

pub type Site = StaticSite<dyn CmsClient, AskamaPages, InMemoryPageCache, SystemClock>;
pub type Sitemap = SitemapGenerator<dyn CmsClient, SystemClock>;

/// Everything a command needs to serve pages and the sitemap
pub struct App {
    pub site: Site,
    pub sitemap: Sitemap,
    pub templates: Arc<AskamaPages>,
}

impl App {
    pub fn new(cms: Arc<dyn CmsClient>, config: &AppConfig) -> Result<Self> {
        let fetcher = ContentFetcher::new(cms);
        let clock = Arc::new(SystemClock);
        let templates = Arc::new(AskamaPages::new(config.site.title.clone()));

        let builder = PageBuilder::new(
            fetcher.clone(),
            PageConfig {
                related_posts_limit: config.site.related_posts_limit,
                comments_enabled: config.site.comments_enabled,
            },
        );

        let site = StaticSite::new(
            builder,
            Arc::clone(&templates),
            Arc::new(InMemoryPageCache::with_clock(
                config.site.cache_capacity()?,
                Arc::clone(&clock) as Arc<dyn folio_domain::Clock>,
            )),
            Arc::clone(&clock),
            config.site.revalidate(),
        );

        let sitemap = SitemapGenerator::new(fetcher, clock, &config.site.url);

        Ok(Self {
            site,
            sitemap,
            templates,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(build_cms(config)?, config)
    }
}

/// Build the CMS client named by `cms.provider`
pub fn build_cms(config: &AppConfig) -> Result<Arc<dyn CmsClient>> {
    match config.cms.provider.as_str() {
        "wisp" => {
            let client = WispClient::with_base_url(
                &config.cms.base_url,
                &config.cms.blog_id,
                Duration::from_secs(config.cms.timeout_secs),
            )
            .context("Failed to initialize Wisp client (is cms.blog_id set?)")?;
            Ok(Arc::new(client))
        }
        "stub" => {
            tracing::warn!("Using stub CMS with sample content");
            Ok(Arc::new(StubCms::sample()))
        }
        other => bail!("Unknown CMS provider: {}", other),
    }
}
