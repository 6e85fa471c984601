// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! `product-crawler extract <HTML_FILE>...`: extract from saved pages, no browser.

use crate::extract::profile::ExtractionProfile;
use crate::extract::FieldExtractor;
use crate::output::{save_results, OutputPaths};
use crate::record::ProductRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Extract one record per HTML file, in argument order.
pub async fn extract_files(
    extractor: &FieldExtractor,
    files: &[PathBuf],
) -> Result<Vec<ProductRecord>> {
    let mut records = Vec::with_capacity(files.len());
    for file in files {
        let html = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        info!("extracting {}", file.display());
        records.push(extractor.extract_html(&html).await);
    }
    Ok(records)
}

/// Run the extract command. Without output paths, records go to stdout as JSON.
pub async fn run(
    files: &[PathBuf],
    profile: Option<&Path>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    let profile = ExtractionProfile::load(profile).context("failed to load extraction profile")?;
    let extractor = FieldExtractor::new(&profile)?;
    let records = extract_files(&extractor, files).await?;

    if csv.is_none() && json.is_none() {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let defaults = OutputPaths::default();
    let paths = OutputPaths {
        csv: csv.unwrap_or(defaults.csv),
        json: json.unwrap_or(defaults.json),
    };
    save_results(&records, &paths).context("failed to save results")?;
    Ok(())
}
