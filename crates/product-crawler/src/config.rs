// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration loading and resolution.

use crate::error::{CrawlError, CrawlResult};
use crate::output::{OutputPaths, DEFAULT_CSV_PATH, DEFAULT_JSON_PATH};
use crate::renderer::DEFAULT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "PRODUCT_CRAWLER_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "crawler.json";

/// Settings for a crawl run. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    /// Product page URLs, crawled in order.
    pub urls: Vec<String>,
    pub timeout_ms: u64,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    /// Extraction profile file; the embedded profile when unset.
    pub profile: Option<PathBuf>,
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            json_path: PathBuf::from(DEFAULT_JSON_PATH),
            profile: None,
            chromium_path: None,
            headless: true,
        }
    }
}

impl CrawlConfig {
    pub fn from_json_str(json: &str) -> CrawlResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CrawlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> CrawlResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CrawlError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| CrawlError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the resolved config file, or defaults when there is none.
    pub fn load(explicit: Option<&Path>) -> CrawlResult<Self> {
        match resolve_config_path(explicit) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> CrawlResult<()> {
        if self.timeout_ms == 0 {
            return Err(CrawlError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            csv: self.csv_path.clone(),
            json: self.json_path.clone(),
        }
    }
}

/// Resolve the config file path: explicit, then env, then `./crawler.json`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    local.exists().then_some(local)
}

/// Parse a URL list: one per line, blank lines and `#` comments skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn read_url_file(path: &Path) -> CrawlResult<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_url_list(&text))
}
