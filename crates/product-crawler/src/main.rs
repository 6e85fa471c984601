// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use product_crawler::cli::{self, crawl_cmd::CrawlOptions, logging::Verbosity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "product-crawler",
    about = "Extract product data from JS-rendered e-commerce pages",
    version,
    after_help = "Run 'product-crawler <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render product pages and save extracted fields to CSV and JSON
    Crawl {
        /// Product page URLs, crawled in order
        urls: Vec<String>,
        /// File with one URL per line ('#' starts a comment)
        #[arg(long)]
        url_file: Option<PathBuf>,
        /// CSV output path [default: product.csv]
        #[arg(long)]
        csv: Option<PathBuf>,
        /// JSON output path [default: product.json]
        #[arg(long)]
        json: Option<PathBuf>,
        /// Navigation timeout in milliseconds [default: 90000]
        #[arg(long)]
        timeout: Option<u64>,
        /// Extraction profile JSON (defaults to the built-in Tokopedia profile)
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Chromium executable to launch
        #[arg(long)]
        chromium: Option<PathBuf>,
        /// Show the browser window
        #[arg(long)]
        headful: bool,
        /// Config file (defaults to $PRODUCT_CRAWLER_CONFIG or ./crawler.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Extract fields from saved HTML files without a browser
    Extract {
        /// HTML files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Extraction profile JSON
        #[arg(long)]
        profile: Option<PathBuf>,
        /// CSV output path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// JSON output path
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Check environment and diagnose issues
    Doctor {
        /// Extraction profile JSON to validate
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::logging::init(Verbosity::from_flags(cli.verbose, cli.quiet), cli.log_json)?;

    let result = match cli.command {
        Commands::Crawl {
            urls,
            url_file,
            csv,
            json,
            timeout,
            profile,
            chromium,
            headful,
            config,
        } => {
            cli::crawl_cmd::run(CrawlOptions {
                urls,
                url_file,
                csv,
                json,
                timeout_ms: timeout,
                profile,
                chromium,
                headful,
                config,
            })
            .await
        }
        Commands::Extract {
            files,
            profile,
            csv,
            json,
        } => cli::extract_cmd::run(&files, profile.as_deref(), csv, json).await,
        Commands::Doctor { profile } => cli::doctor::run(profile.as_deref()).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "product-crawler", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
