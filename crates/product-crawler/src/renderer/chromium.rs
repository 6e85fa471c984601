// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-based renderer using chromiumoxide.
//!
//! Every call to [`ChromiumRenderer::render`] launches its own headless
//! browser, so no cookies, cache or JS state leak between product pages.

use super::{NavigationResult, RenderedPage, Renderer};
use crate::error::{CrawlError, CrawlResult};
use crate::extract::PageHandle;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::js::EvaluationResult;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Environment variable overriding Chromium discovery.
pub const CHROMIUM_PATH_ENV: &str = "PRODUCT_CRAWLER_CHROMIUM_PATH";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. PRODUCT_CRAWLER_CHROMIUM_PATH env
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.product-crawler/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".product-crawler/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".product-crawler/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".product-crawler/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".product-crawler/chromium/chrome-linux64/chrome"),
                home.join(".product-crawler/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launch settings for each browser session.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Explicit executable; discovered with [`find_chromium`] when `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            window_size: (1920, 1080),
            extra_args: Vec::new(),
        }
    }
}

impl BrowserSettings {
    fn to_config(&self) -> CrawlResult<BrowserConfig> {
        let chrome_path = self
            .executable
            .clone()
            .or_else(find_chromium)
            .ok_or_else(|| {
                CrawlError::BrowserLaunch(format!(
                    "Chromium not found. Install Chrome or set {CHROMIUM_PATH_ENV}."
                ))
            })?;

        let (width, height) = self.window_size;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(width, height)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        if self.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        for arg in &self.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder
            .build()
            .map_err(|e| CrawlError::BrowserLaunch(format!("failed to build browser config: {e}")))
    }
}

/// One browser process and its CDP handler task.
///
/// [`BrowserSession::close`] shuts the browser down cleanly. If a session is
/// dropped instead, the handler task is aborted and chromiumoxide kills the
/// child process.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(settings: &BrowserSettings) -> CrawlResult<Self> {
        let config = settings.to_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {e}");
                }
            }
        });

        Ok(Self { browser, handler })
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("failed to reap browser process: {e}");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Chromium-based renderer.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    settings: BrowserSettings,
}

impl ChromiumRenderer {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str, timeout_ms: u64) -> CrawlResult<Box<dyn RenderedPage>> {
        let session = BrowserSession::launch(&self.settings).await?;
        info!("crawling {url}");

        match open_page(&session, url, timeout_ms).await {
            Ok((page, navigation, html)) => {
                debug!(
                    final_url = %navigation.final_url,
                    load_time_ms = navigation.load_time_ms,
                    html_bytes = html.len(),
                    "page rendered"
                );
                Ok(Box::new(ChromiumPage {
                    session,
                    page,
                    navigation,
                    html,
                }))
            }
            Err(e) => {
                session.close().await;
                Err(e)
            }
        }
    }
}

async fn open_page(
    session: &BrowserSession,
    url: &str,
    timeout_ms: u64,
) -> CrawlResult<(Page, NavigationResult, String)> {
    let page = session
        .browser
        .new_page("about:blank")
        .await
        .map_err(|e| CrawlError::Navigation {
            url: url.to_string(),
            reason: format!("failed to create page: {e}"),
        })?;

    let start = Instant::now();
    let result = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<_, chromiumoxide::error::CdpError>(())
    })
    .await;
    let load_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            return Err(CrawlError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(CrawlError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms,
            })
        }
    }

    let final_url = page
        .url()
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| url.to_string());

    let capture_failed = |reason: String| CrawlError::Navigation {
        url: url.to_string(),
        reason: format!("failed to capture HTML: {reason}"),
    };
    let evaluated = page
        .evaluate("document.documentElement.outerHTML")
        .await
        .map_err(|e| capture_failed(e.to_string()))?;
    let html: String = evaluated
        .into_value()
        .map_err(|e| capture_failed(format!("{e:?}")))?;

    Ok((
        page,
        NavigationResult {
            final_url,
            load_time_ms,
        },
        html,
    ))
}

/// A rendered page that owns its browser session.
pub struct ChromiumPage {
    session: BrowserSession,
    page: Page,
    navigation: NavigationResult,
    html: String,
}

/// Script returning the text content of the first match of a selector.
fn first_text_script(selector: &str) -> Result<String> {
    let quoted = serde_json::to_string(selector)?;
    Ok(format!(
        "(() => {{ const el = document.querySelector({quoted}); return el ? el.textContent : null; }})()"
    ))
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn first_text(&self, selector: &str) -> Result<Option<String>> {
        let script = first_text_script(selector)?;
        let result = self
            .page
            .evaluate(script)
            .await
            .with_context(|| format!("query {selector:?} failed"))?;

        query_text(result)
    }
}

/// A `null` result (no matching element) arrives with no value at all.
fn query_text(result: EvaluationResult) -> Result<Option<String>> {
    match result.value() {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(_) => result
            .into_value::<Option<String>>()
            .map_err(|e| anyhow::anyhow!("failed to convert query result: {e:?}")),
    }
}

#[async_trait]
impl RenderedPage for ChromiumPage {
    fn raw_html(&self) -> &str {
        &self.html
    }

    fn navigation(&self) -> &NavigationResult {
        &self.navigation
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumPage { session, page, .. } = *self;
        let closed = page.close().await.context("failed to close page");
        session.close().await;
        closed
    }
}
