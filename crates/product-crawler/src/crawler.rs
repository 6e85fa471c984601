// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequential crawl loop: render, extract, close, one URL at a time.

use crate::error::{CrawlError, CrawlResult};
use crate::extract::FieldExtractor;
use crate::record::ProductRecord;
use crate::renderer::Renderer;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A URL that produced no record, and why.
#[derive(Debug)]
pub struct SkippedUrl {
    pub url: String,
    pub error: CrawlError,
}

/// Outcome of crawling a list of URLs.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    /// Records in input order, one per successfully rendered URL.
    pub records: Vec<ProductRecord>,
    pub skipped: Vec<SkippedUrl>,
}

pub struct Crawler {
    renderer: Arc<dyn Renderer>,
    extractor: FieldExtractor,
    timeout_ms: u64,
}

impl Crawler {
    pub fn new(renderer: Arc<dyn Renderer>, extractor: FieldExtractor, timeout_ms: u64) -> Self {
        Self {
            renderer,
            extractor,
            timeout_ms,
        }
    }

    /// Render and extract a single URL.
    pub async fn crawl_one(&self, url: &str) -> CrawlResult<ProductRecord> {
        url::Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let page = self.renderer.render(url, self.timeout_ms).await?;
        let navigation = page.navigation();
        debug!(
            final_url = %navigation.final_url,
            load_time_ms = navigation.load_time_ms,
            "extracting fields"
        );
        let record = self.extractor.extract(page.as_ref(), page.raw_html()).await;
        if let Err(e) = page.close().await {
            warn!("failed to close page for {url}: {e:#}");
        }
        Ok(record)
    }

    /// Crawl every URL in order. URL-level failures are logged and skipped.
    pub async fn crawl_all<S: AsRef<str>>(&self, urls: &[S]) -> CrawlSummary {
        let mut summary = CrawlSummary::default();
        for (i, url) in urls.iter().enumerate() {
            let url = url.as_ref();
            info!("[{}/{}] {url}", i + 1, urls.len());
            match self.crawl_one(url).await {
                Ok(record) => summary.records.push(record),
                Err(error) => {
                    warn!("no data for {url}: {error}");
                    summary.skipped.push(SkippedUrl {
                        url: url.to_string(),
                        error,
                    });
                }
            }
        }
        info!(
            records = summary.records.len(),
            skipped = summary.skipped.len(),
            "crawl finished"
        );
        summary
    }
}
