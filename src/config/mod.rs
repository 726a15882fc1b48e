//! Configuration module for Sign-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sign_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sign-harvest.toml")).unwrap();
//! println!("Crawling {}", config.site.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash, parse_config};
