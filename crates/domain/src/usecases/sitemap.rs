//! Sitemap use case - static routes plus one entry per post

use std::sync::Arc;

use crate::model::{ChangeFrequency, SitemapEntry};
use crate::ports::{Clock, CmsClient};
use crate::usecases::fetch::ContentFetcher;
use crate::usecases::pages::{BLOG_PATH, post_path};

/// Generates sitemap entries for the site
pub struct SitemapGenerator<C: CmsClient + ?Sized, Cl: Clock + ?Sized> {
    fetcher: ContentFetcher<C>,
    clock: Arc<Cl>,
    site_url: String,
}

impl<C: CmsClient + ?Sized, Cl: Clock + ?Sized> SitemapGenerator<C, Cl> {
    pub fn new(fetcher: ContentFetcher<C>, clock: Arc<Cl>, site_url: &str) -> Self {
        Self {
            fetcher,
            clock,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Root and blog index, stamped with the current time
    pub fn static_entries(&self) -> Vec<SitemapEntry> {
        let now = self.clock.now();
        vec![
            SitemapEntry {
                url: self.site_url.clone(),
                last_modified: now,
                change_frequency: ChangeFrequency::Monthly,
                priority: 1.0,
            },
            SitemapEntry {
                url: format!("{}{}", self.site_url, BLOG_PATH),
                last_modified: now,
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.9,
            },
        ]
    }

    /// All entries. A failed post listing leaves only the static entries.
    pub async fn generate(&self) -> Vec<SitemapEntry> {
        let mut entries = self.static_entries();
        let posts = self.fetcher.fetch_all_posts().await;

        entries.extend(posts.iter().map(|post| SitemapEntry {
            url: format!("{}{}", self.site_url, post_path(&post.slug)),
            last_modified: post.last_modified(),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        }));

        tracing::info!(
            entries = entries.len(),
            posts = posts.len(),
            "Generated sitemap"
        );
        entries
    }
}
