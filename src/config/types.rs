use serde::Deserialize;
use url::Url;

/// Main configuration structure for Sign-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// The dictionary site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site root; sign links resolve against it
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Path of the category index page, relative to the root
    #[serde(rename = "categories-path")]
    pub categories_path: String,

    /// Locale segment used in the crawled links (e.g. "es.es")
    pub locale: String,
}

impl SiteConfig {
    /// Parsed root URL
    pub fn root(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.root_url)
    }

    /// Absolute URL of the category index page
    pub fn categories_url(&self) -> Result<Url, url::ParseError> {
        self.root()?.join(&self.categories_path)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value sent with every request
    pub value: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Whole-request timeout; a timeout aborts the run like any fetch error
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// In-flight requests during localization (the category crawl is sequential)
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one backup file per category
    #[serde(rename = "backup-dir")]
    pub backup_dir: String,

    /// Path of the merged JSON dataset
    #[serde(rename = "merged-path")]
    pub merged_path: String,
}
