//! Sitemap command - print or write the sitemap XML

use anyhow::{Context, Result};
use folio_domain::PageTemplate;
use std::fs;
use std::path::PathBuf;

use crate::app::App;
use crate::args::SitemapArgs;
use crate::config::AppConfig;

pub async fn execute(args: SitemapArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let app = App::from_config(&config)?;

    let entries = app.sitemap.generate().await;
    let xml = app
        .templates
        .render_sitemap(&entries)
        .context("Failed to render sitemap")?;

    match args.output {
        Some(path) => {
            fs::write(&path, xml)
                .with_context(|| format!("Failed to write sitemap: {}", path.display()))?;
            tracing::info!(path = %path.display(), entries = entries.len(), "Wrote sitemap");
        }
        None => println!("{}", xml),
    }

    Ok(())
}
