//! Config command - write an example folio.toml

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => init_config(&path, force),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    // Env overrides apply here as they do at runtime
    let config = AppConfig::load(Some(path))
        .with_context(|| format!("Written config does not load: {}", path.display()))?;

    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    for (i, step) in next_steps(&config).iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    Ok(())
}

/// One hint per config section that still needs attention, then how to run
fn next_steps(config: &AppConfig) -> Vec<String> {
    let mut steps = Vec::new();

    match config.cms.provider.as_str() {
        "wisp" if config.cms.blog_id.trim().is_empty() => steps.push(
            "[cms] Set blog_id to your Wisp blog ID (or FOLIO__CMS__BLOG_ID)".to_string(),
        ),
        "wisp" => steps.push(format!(
            "[cms] Using Wisp blog {} at {}",
            config.cms.blog_id, config.cms.base_url
        )),
        other => steps.push(format!(
            "[cms] Provider '{}' serves sample content; switch to 'wisp' for a real blog",
            other
        )),
    }

    if config.site.url.contains("localhost") {
        steps.push(format!(
            "[site] Set url to the public address (now {}); sitemap links use it",
            config.site.url
        ));
    }

    steps.push("Run 'folio doctor' to check CMS connectivity".to_string());
    steps.push("Run 'folio render /blog' to preview the index page".to_string());
    steps.push(format!(
        "[server] Run 'folio serve' to listen on {}",
        config.server.bind
    ));
    steps
}
