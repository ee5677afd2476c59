//! Crawl context plus the shared list-discovery and bounded-fetch plumbing.
//!
//! Both site crawlers follow the same pipeline: paged list discovery until
//! the item set stops growing, detail fetches with a bounded number of
//! requests in flight, then coordinate filtering and persistence. The
//! context owns the HTTP client so nothing crawl-scoped outlives a run.

use std::collections::HashSet;
use std::future::Future;

use anyhow::{Context, Result};
use futures_util::{stream, StreamExt};

use crate::controls::CrawlControls;

const USER_AGENT: &str = "artpulse/0.1 (exhibition map crawler)";

/// Per-run crawl state: the HTTP client and the control knobs.
#[derive(Debug, Clone)]
pub struct CrawlContext {
    http: reqwest::Client,
    controls: CrawlControls,
}

impl CrawlContext {
    /// Builds a context with a client honoring the configured timeout.
    pub fn new(controls: CrawlControls) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(controls.request_timeout())
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .context("failed to build crawl HTTP client")?;
        Ok(Self { http, controls })
    }

    /// Returns the crawl controls.
    pub fn controls(&self) -> &CrawlControls {
        &self.controls
    }

    /// Fetches a page body as text, treating non-2xx statuses as errors.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("non-success status: {url}"))?;
        response
            .text()
            .await
            .with_context(|| format!("failed to read body: {url}"))
    }
}

/// Accumulates list items across pages, deduplicating by identifier and
/// reporting whether a page contributed anything new.
#[derive(Debug, Default)]
pub struct ListAccumulator<T> {
    seen: HashSet<String>,
    items: Vec<T>,
}

impl<T> ListAccumulator<T> {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Inserts an item unless its id was already seen. Returns true when
    /// the item was new.
    pub fn insert(&mut self, id: &str, item: T) -> bool {
        if self.seen.insert(id.to_string()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    /// Number of distinct items collected so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the accumulator, yielding items in discovery order.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Runs `fetch` over `items` with at most `concurrency` futures in flight,
/// keeping discovery order and dropping items whose future resolves to
/// `None`. Item-level failure handling (log and skip) lives inside the
/// per-item future.
pub async fn fetch_bounded<S, T, F, Fut>(items: Vec<S>, concurrency: usize, fetch: F) -> Vec<T>
where
    F: Fn(S) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    stream::iter(items.into_iter().map(fetch))
        .buffered(concurrency.max(1))
        .filter_map(|result| async move { result })
        .collect()
        .await
}
