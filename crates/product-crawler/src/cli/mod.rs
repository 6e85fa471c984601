//! CLI subcommand implementations for the product-crawler binary.

pub mod crawl_cmd;
pub mod doctor;
pub mod extract_cmd;
pub mod logging;
