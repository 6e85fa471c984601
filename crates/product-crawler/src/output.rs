// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! CSV and JSON output, written once at the end of a run.

use crate::error::{CrawlError, CrawlResult};
use crate::record::ProductRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CSV_PATH: &str = "product.csv";
pub const DEFAULT_JSON_PATH: &str = "product.json";

/// Destination files for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            csv: PathBuf::from(DEFAULT_CSV_PATH),
            json: PathBuf::from(DEFAULT_JSON_PATH),
        }
    }
}

/// What [`save_results`] did.
#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { csv: PathBuf, json: PathBuf, records: usize },
    /// Nothing to write; no file was touched.
    Skipped,
}

/// Write `records` to both output files. An empty list writes nothing.
pub fn save_results(records: &[ProductRecord], paths: &OutputPaths) -> CrawlResult<SaveOutcome> {
    if records.is_empty() {
        warn!("{}", CrawlError::EmptyResultSet);
        return Ok(SaveOutcome::Skipped);
    }

    write_csv(records, &paths.csv)?;
    info!("saved CSV → {}", paths.csv.display());
    write_json(records, &paths.json)?;
    info!("saved JSON → {}", paths.json.display());

    Ok(SaveOutcome::Written {
        csv: paths.csv.clone(),
        json: paths.json.clone(),
        records: records.len(),
    })
}

/// CSV with a header row in field order, quoting only where needed.
pub fn write_csv(records: &[ProductRecord], path: &Path) -> CrawlResult<()> {
    let file = create(path)?;
    write_csv_to(records, file)
}

pub fn write_csv_to<W: Write>(records: &[ProductRecord], out: W) -> CrawlResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON array with non-ASCII text left unescaped.
pub fn write_json(records: &[ProductRecord], path: &Path) -> CrawlResult<()> {
    let mut out = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut out, records)?;
    out.flush()?;
    Ok(())
}

fn create(path: &Path) -> CrawlResult<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}
