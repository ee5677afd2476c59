//! Crawl throttle and credential controls shared across the binaries.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::naver::{NaverClient, NaverCredentials, DEFAULT_MAX_RETRIES};

/// Tunable knobs that bound crawl behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlControls {
    max_list_pages: usize,
    detail_concurrency: usize,
    request_timeout: Duration,
}

impl CrawlControls {
    /// Constructs a new set of crawl controls.
    pub fn new(max_list_pages: usize, detail_concurrency: usize, request_timeout: Duration) -> Self {
        Self {
            max_list_pages,
            detail_concurrency,
            request_timeout,
        }
    }

    /// Maximum listing pages walked before list discovery gives up.
    pub fn max_list_pages(&self) -> usize {
        self.max_list_pages
    }

    /// Maximum detail-page fetches in flight at once.
    pub fn detail_concurrency(&self) -> usize {
        self.detail_concurrency
    }

    /// Per-request timeout for page fetches.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for CrawlControls {
    fn default() -> Self {
        Self {
            max_list_pages: 10,
            detail_concurrency: 3,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Command-line interface shared by the crawl and update binaries. Every
/// flag has a default or env fallback, so the binaries run with zero
/// arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "artpulse", about = "Seoul exhibition crawl controls")]
pub struct Cli {
    /// Path of the exhibition JSON data file
    #[arg(long, env = "ARTPULSE_DATA", default_value = "data/exhibitions.json")]
    pub data_path: PathBuf,

    /// Maximum listing pages to walk during list discovery
    #[arg(long, env = "ARTPULSE_MAX_LIST_PAGES", default_value_t = 10)]
    pub max_list_pages: usize,

    /// Maximum detail-page fetches in flight
    #[arg(long, env = "ARTPULSE_DETAIL_CONCURRENCY", default_value_t = 3)]
    pub detail_concurrency: usize,

    /// Per-request timeout in seconds for page fetches
    #[arg(long, env = "ARTPULSE_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Rate-limit retry budget for blog-count lookups
    #[arg(long, env = "ARTPULSE_BLOG_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub blog_retries: usize,

    /// Naver OpenAPI client id; blog counts are disabled when absent
    #[arg(long, env = "NAVER_CLIENT_ID")]
    pub naver_client_id: Option<String>,

    /// Naver OpenAPI client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET")]
    pub naver_client_secret: Option<String>,
}

impl Cli {
    /// Converts the parsed CLI into `CrawlControls`.
    pub fn build_controls(&self) -> CrawlControls {
        CrawlControls::new(
            self.max_list_pages,
            self.detail_concurrency,
            Duration::from_secs(self.timeout_secs),
        )
    }

    /// Builds the blog-search client from the configured credentials.
    /// Missing credentials yield a disabled client, not an error.
    pub fn naver_client(&self) -> NaverClient {
        let credentials = NaverCredentials::from_parts(
            self.naver_client_id.clone(),
            self.naver_client_secret.clone(),
        );
        NaverClient::new(credentials).with_max_retries(self.blog_retries)
    }
}
