//! Sign-Harvest: a sign-language dictionary crawler
//!
//! This crate walks a category-indexed sign-language dictionary site, breadth-first,
//! and writes one newline-delimited JSON record per sign page (gloss, grammatical
//! category, thematic category and video URL). Progress is checkpointed per category
//! so an aborted run can resume from the category it stopped in.

pub mod config;
pub mod crawler;
pub mod localize;
pub mod output;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sign-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Failed to open backup file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed record in {}:{line}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Sign page {href} has {count} videos, expected one")]
    MultipleVideos { href: String, count: usize },

    #[error("Crawl aborted in category #{category_index} ({category}): {source}")]
    Aborted {
        category_index: usize,
        category: String,
        source: Box<HarvestError>,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns true for network failures, timeouts and non-success responses
    pub fn is_fetch_error(&self) -> bool {
        match self {
            Self::Http { .. } | Self::HttpStatus { .. } | Self::Timeout { .. } => true,
            Self::Aborted { source, .. } => source.is_fetch_error(),
            _ => false,
        }
    }

    /// The 1-based index of the category that was being crawled when the run aborted
    pub fn category_index(&self) -> Option<usize> {
        match self {
            Self::Aborted { category_index, .. } => Some(*category_index),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sign-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, HttpFetcher, PageFetcher};
pub use output::{CrawlReport, RecordWriter, SignRecord, VideoRef};
pub use state::{CategoryLink, LinkKind, PrefixVisitedSet, ThemeLink};
