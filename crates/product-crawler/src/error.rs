// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the crawler library.
//!
//! URL-level errors (`NavigationTimeout`, `Navigation`, `BrowserLaunch`,
//! `InvalidUrl`) drop a single URL from the run. `FieldLookup` never leaves
//! the extractor. The remaining variants abort the command that hit them.

use crate::record::Field;

/// Errors that can occur while crawling and extracting product pages.
#[derive(thiserror::Error, Debug)]
pub enum CrawlError {
    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("lookup for {field} failed: {reason}")]
    FieldLookup { field: Field, reason: String },

    #[error("no product records to save")]
    EmptyResultSet,

    #[error("invalid extraction profile: {0}")]
    Profile(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrawlError {
    /// Whether this error only affects the URL being processed.
    pub fn is_url_level(&self) -> bool {
        matches!(
            self,
            CrawlError::NavigationTimeout { .. }
                | CrawlError::Navigation { .. }
                | CrawlError::BrowserLaunch(_)
                | CrawlError::InvalidUrl { .. }
        )
    }
}

pub type CrawlResult<T> = Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_level_classification() {
        let timeout = CrawlError::NavigationTimeout {
            url: "https://example.com".into(),
            timeout_ms: 90_000,
        };
        assert!(timeout.is_url_level());
        assert!(!CrawlError::EmptyResultSet.is_url_level());
        assert!(!CrawlError::Profile("bad".into()).is_url_level());
    }

    #[test]
    fn test_timeout_message_names_url() {
        let err = CrawlError::NavigationTimeout {
            url: "https://example.com/p".into(),
            timeout_ms: 500,
        };
        assert_eq!(
            err.to_string(),
            "navigation to https://example.com/p timed out after 500ms"
        );
    }
}
