// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Product crawler library: render JS-heavy product pages in headless
//! Chromium and extract product fields into flat CSV and JSON files.
//!
//! The pipeline per URL is [`renderer::Renderer::render`] →
//! [`extract::FieldExtractor::extract`] → close, driven sequentially by
//! [`crawler::Crawler`]; [`output::save_results`] writes the run's records.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod output;
pub mod record;
pub mod renderer;

#[cfg(test)]
mod test_log;

pub use error::{CrawlError, CrawlResult};
pub use record::{Field, ProductRecord, NOT_AVAILABLE};
