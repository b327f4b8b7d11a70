//! Render command - render a single route to stdout

use anyhow::{Context, Result, bail};
use folio_domain::usecases::{PageStatus, Route};
use std::path::PathBuf;

use crate::app::App;
use crate::args::RenderArgs;
use crate::config::AppConfig;

pub async fn execute(args: RenderArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let Some(route) = Route::parse(&args.path) else {
        bail!("Not a blog route: {} (expected /blog or /blog/<slug>)", args.path);
    };

    let app = App::from_config(&config)?;
    let page = app
        .site
        .render(&route)
        .await
        .with_context(|| format!("Failed to render {}", args.path))?;

    if page.status == PageStatus::NotFound {
        tracing::warn!(path = %args.path, "Rendered not-found page");
    }

    println!("{}", page.body);
    Ok(())
}
