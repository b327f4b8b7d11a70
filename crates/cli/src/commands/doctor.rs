//! Doctor command - validate configuration and show status

use anyhow::Result;
use folio_domain::Limit;
use serde::Serialize;
use std::path::PathBuf;

use crate::app::build_cms;
use crate::args::DoctorArgs;
use crate::config::{AppConfig, MAX_REVALIDATE_SECS};

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    cms: CheckResult,
    site: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        cms: CheckResult::error("Not checked"),
        site: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.cms = check_cms(config).await;
        report.site = check_site(config);
    }

    let checks = [&report.config, &report.cms, &report.site];
    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_cms(config: &AppConfig) -> CheckResult {
    let provider = config.cms.provider.as_str();

    let cms = match build_cms(config) {
        Ok(cms) => cms,
        Err(e) => return CheckResult::error(format!("{:#}", e)),
    };

    // One cheap request proves the blog ID and base URL
    match cms.get_tags(1, Limit::Count(1)).await {
        Ok(tags) => CheckResult::ok(format!("Provider: {}, reachable", provider)).with_details(
            serde_json::json!({
                "provider": provider,
                "base_url": config.cms.base_url,
                "sample_tags": tags.iter().map(|t| &t.name).collect::<Vec<_>>(),
            }),
        ),
        Err(e) => CheckResult::error(format!("Provider: {}, request failed: {}", provider, e)),
    }
}

fn check_site(config: &AppConfig) -> CheckResult {
    let url = config.site.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return CheckResult::error(format!("site.url must be an absolute http(s) URL: {}", url));
    }

    if let Err(e) = config.site.cache_capacity() {
        return CheckResult::error(format!("{:#}", e));
    }

    if config.site.is_revalidate_clamped() {
        return CheckResult::warn(format!(
            "site.revalidate_secs {} is out of range, clamped to {}s",
            config.site.revalidate_secs, MAX_REVALIDATE_SECS
        ));
    }

    if config.site.revalidate_secs == 0 {
        return CheckResult::warn("site.revalidate_secs is 0: every request regenerates its page");
    }

    CheckResult::ok(format!(
        "URL: {}, revalidate every {}s, up to {} cached pages",
        url, config.site.revalidate_secs, config.site.cache_max_entries
    ))
}

fn print_report(report: &DoctorReport) {
    println!("folio Doctor Report");
    println!("===================");
    println!();

    print_check("Config", &report.config);
    print_check("CMS", &report.cms);
    print_check("Site", &report.site);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to serve! Try: folio serve");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
