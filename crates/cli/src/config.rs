//! Configuration loading and management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Longest staleness window honoured; larger values are clamped to a year
pub const MAX_REVALIDATE_SECS: u64 = 365 * 24 * 60 * 60;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cms: CmsConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// `wisp` or `stub`
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub blog_id: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public URL used for sitemap links
    #[serde(default = "default_site_url")]
    pub url: String,

    #[serde(default = "default_site_title")]
    pub title: String,

    /// Staleness window for rendered pages
    #[serde(default = "default_revalidate")]
    pub revalidate_secs: u64,

    /// Upper bound on rendered pages kept in memory
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    #[serde(default = "default_related_posts_limit")]
    pub related_posts_limit: u32,

    #[serde(default = "default_true")]
    pub comments_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

// Default value functions
fn default_provider() -> String {
    "wisp".to_string()
}

fn default_base_url() -> String {
    folio_adapters::cms::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_site_title() -> String {
    "Blog".to_string()
}

fn default_revalidate() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    1000
}

fn default_related_posts_limit() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            blog_id: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            title: default_site_title(),
            revalidate_secs: default_revalidate(),
            cache_max_entries: default_cache_max_entries(),
            related_posts_limit: default_related_posts_limit(),
            comments_enabled: default_true(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl SiteConfig {
    /// Staleness window for rendered pages, clamped to `MAX_REVALIDATE_SECS`
    pub fn revalidate(&self) -> time::Duration {
        let secs = self.revalidate_secs.min(MAX_REVALIDATE_SECS);
        time::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    pub fn is_revalidate_clamped(&self) -> bool {
        self.revalidate_secs > MAX_REVALIDATE_SECS
    }

    pub fn cache_capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.cache_max_entries)
            .context("site.cache_max_entries must be greater than 0")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./folio.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("FOLIO")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.site.cache_max_entries == 0 {
            bail!("site.cache_max_entries must be greater than 0");
        }
        if self.site.is_revalidate_clamped() {
            tracing::warn!(
                revalidate_secs = self.site.revalidate_secs,
                max = MAX_REVALIDATE_SECS,
                "site.revalidate_secs is out of range, clamping"
            );
        }
        Ok(())
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# folio configuration

[cms]
provider = "wisp"  # wisp, stub
base_url = "https://www.wisp.blog"
# Blog ID from the Wisp dashboard (or set FOLIO__CMS__BLOG_ID)
blog_id = ""
timeout_secs = 30

[site]
url = "http://localhost:3000"
title = "Blog"
# Rendered pages are reused for this long before being regenerated
revalidate_secs = 3600
# Rendered pages kept in memory; the least recently used is dropped first
cache_max_entries = 1000
related_posts_limit = 3
comments_enabled = true

[server]
bind = "127.0.0.1:3000"
"#
        .to_string()
    }
}
