//! Environment readiness check.

use crate::config::{resolve_config_path, CrawlConfig};
use crate::extract::profile::ExtractionProfile;
use crate::renderer::chromium::{find_chromium, CHROMIUM_PATH_ENV};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Check Chromium availability, the config file and the extraction profile.
pub async fn run(profile: Option<&Path>) -> Result<()> {
    println!("product-crawler doctor");
    println!("======================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium = find_chromium();
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!("[!!] Chromium NOT found. Install Chrome or set {CHROMIUM_PATH_ENV}."),
    }

    let config = match resolve_config_path(None) {
        Some(path) if !path.exists() => {
            println!("[!!] Config file does not exist: {}", path.display());
            None
        }
        Some(path) => match CrawlConfig::from_path(&path) {
            Ok(config) => {
                println!("[OK] Config file: {}", path.display());
                Some(config)
            }
            Err(e) => {
                println!("[!!] Config file is invalid: {e}");
                None
            }
        },
        None => {
            println!("[--] No config file, using defaults");
            None
        }
    };

    let profile = profile_path(profile, config.as_ref());
    if let Some(path) = &profile {
        println!("     Profile file: {}", path.display());
    }

    let profile_ok = match ExtractionProfile::load(profile.as_deref()).and_then(|p| {
        p.compile()?;
        Ok(p)
    }) {
        Ok(p) => {
            println!("[OK] Extraction profile '{}' is valid", p.name);
            true
        }
        Err(e) => {
            println!("[!!] Extraction profile is invalid: {e}");
            false
        }
    };

    println!();
    if chromium.is_some() && profile_ok {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

/// `--profile` wins over the config file's `profile` key.
fn profile_path(explicit: Option<&Path>, config: Option<&CrawlConfig>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.and_then(|c| c.profile.clone()))
}
