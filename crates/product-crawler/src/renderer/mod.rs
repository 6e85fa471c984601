// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for browser-based page rendering.
//!
//! A [`Renderer`] turns a URL into a [`RenderedPage`]: a live page handle that
//! answers structural queries, plus the HTML captured right after navigation.
//! Each rendered page owns its browser session; [`RenderedPage::close`] tears
//! it down, and dropping the page without closing still releases the browser.

pub mod chromium;

use crate::error::CrawlResult;
use crate::extract::PageHandle;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default navigation timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 90_000;

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A browser engine that renders one URL per call.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `url`, waiting at most `timeout_ms` for navigation to finish.
    async fn render(&self, url: &str, timeout_ms: u64) -> CrawlResult<Box<dyn RenderedPage>>;
}

/// A rendered page together with the HTML captured after navigation.
#[async_trait]
pub trait RenderedPage: PageHandle {
    /// Full page HTML as captured after navigation.
    fn raw_html(&self) -> &str;
    /// Navigation details.
    fn navigation(&self) -> &NavigationResult;
    /// Close the page and release its browser.
    async fn close(self: Box<Self>) -> Result<()>;
}
