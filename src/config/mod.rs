//! Configuration module for Sitescrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so running without a file is the same as
//! loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use sitescrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitescrape.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ExtractionConfig, UserAgentConfig, UNLIMITED_PAGES};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, MAX_PACING_DELAY_MS, MAX_TIMEOUT_SECS};
