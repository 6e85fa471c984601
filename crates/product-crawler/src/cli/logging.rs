// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber setup for the binary.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Log verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "product_crawler=warn",
            Verbosity::Normal => "product_crawler=info",
            Verbosity::Verbose => "product_crawler=debug",
        }
    }
}

/// Build the filter: `RUST_LOG` when set, otherwise the verbosity directive.
pub fn env_filter(verbosity: Verbosity) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) if !spec.trim().is_empty() => {
            EnvFilter::try_new(spec).map_err(|e| anyhow!("invalid RUST_LOG: {e}"))
        }
        _ => EnvFilter::try_new(verbosity.directive()).map_err(|e| anyhow!("{e}")),
    }
}

/// Install the global subscriber, writing to stderr.
pub fn init(verbosity: Verbosity, json: bool) -> Result<()> {
    let filter = env_filter(verbosity)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
