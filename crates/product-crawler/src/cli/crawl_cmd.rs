// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! `product-crawler crawl [URL]...`: render, extract and save product pages.

use crate::config::{read_url_file, CrawlConfig};
use crate::crawler::Crawler;
use crate::extract::profile::ExtractionProfile;
use crate::extract::FieldExtractor;
use crate::output::{save_results, SaveOutcome};
use crate::renderer::chromium::{BrowserSettings, ChromiumRenderer};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line overrides for a crawl run.
#[derive(Debug, Default, Clone)]
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub url_file: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub profile: Option<PathBuf>,
    pub chromium: Option<PathBuf>,
    pub headful: bool,
    pub config: Option<PathBuf>,
}

/// Merge command-line options over the loaded config.
///
/// URLs accumulate in order: config file, then `--url-file`, then arguments.
pub fn resolve(opts: CrawlOptions, mut config: CrawlConfig) -> Result<CrawlConfig> {
    if let Some(path) = &opts.url_file {
        let urls = read_url_file(path)
            .with_context(|| format!("failed to read URL file {}", path.display()))?;
        config.urls.extend(urls);
    }
    config.urls.extend(opts.urls);

    if let Some(csv) = opts.csv {
        config.csv_path = csv;
    }
    if let Some(json) = opts.json {
        config.json_path = json;
    }
    if let Some(timeout_ms) = opts.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if opts.profile.is_some() {
        config.profile = opts.profile;
    }
    if opts.chromium.is_some() {
        config.chromium_path = opts.chromium;
    }
    if opts.headful {
        config.headless = false;
    }

    config.validate()?;
    Ok(config)
}

/// Run the crawl command.
pub async fn run(opts: CrawlOptions) -> Result<()> {
    let base = CrawlConfig::load(opts.config.as_deref()).context("failed to load config")?;
    let config = resolve(opts, base)?;
    if config.urls.is_empty() {
        bail!("no URLs to crawl; pass URLs, --url-file, or set \"urls\" in crawler.json");
    }

    let profile = ExtractionProfile::load(config.profile.as_deref())
        .context("failed to load extraction profile")?;
    let extractor = FieldExtractor::new(&profile)?;

    let renderer = ChromiumRenderer::new(BrowserSettings {
        executable: config.chromium_path.clone(),
        headless: config.headless,
        ..BrowserSettings::default()
    });
    let crawler = Crawler::new(Arc::new(renderer), extractor, config.timeout_ms);

    let summary = crawler.crawl_all(&config.urls).await;
    let outcome = save_results(&summary.records, &config.output_paths())
        .context("failed to save results")?;

    eprintln!(
        "  {} of {} URL(s) extracted",
        summary.records.len(),
        config.urls.len()
    );
    for skipped in &summary.skipped {
        eprintln!("  skipped {}: {}", skipped.url, skipped.error);
    }
    match outcome {
        SaveOutcome::Written { csv, json, .. } => {
            eprintln!("  wrote {} and {}", csv.display(), json.display());
        }
        SaveOutcome::Skipped => eprintln!("  nothing written"),
    }

    Ok(())
}
