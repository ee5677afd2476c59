//! Naver blog-search client used to estimate exhibition popularity.
//!
//! Every failure mode here is non-fatal by design: a `None` count means
//! "unknown" and is a valid steady-state result for the callers, never an
//! error they need to handle.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::normalizer::{build_query, extract_search_title, short_place};

/// Production blog-search endpoint.
pub const BLOG_SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/blog.json";

/// Default number of attempts consumed by rate-limit retries.
pub const DEFAULT_MAX_RETRIES: usize = 3;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Naver OpenAPI credential pair.
#[derive(Debug, Clone)]
pub struct NaverCredentials {
    /// `X-Naver-Client-Id` header value.
    pub client_id: String,
    /// `X-Naver-Client-Secret` header value.
    pub client_secret: String,
}

impl NaverCredentials {
    /// Builds credentials when both values are present and non-empty.
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Some(Self {
                    client_id: id,
                    client_secret: secret,
                })
            }
            _ => None,
        }
    }
}

/// Blog-search client. Without credentials the client is disabled and
/// every lookup returns `None` without touching the network.
#[derive(Debug, Clone)]
pub struct NaverClient {
    http: reqwest::Client,
    credentials: Option<NaverCredentials>,
    endpoint: String,
    max_retries: usize,
    backoff_unit: Duration,
}

#[derive(Debug, Deserialize)]
struct BlogSearchResponse {
    #[serde(default)]
    total: u64,
}

impl NaverClient {
    /// Builds a client; `credentials = None` yields a disabled client.
    pub fn new(credentials: Option<NaverCredentials>) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            endpoint: BLOG_SEARCH_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_millis(1000),
        }
    }

    /// Overrides the search endpoint, e.g. to point at a local stub.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the rate-limit retry budget.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overrides the linear backoff unit (attempt `n` waits `unit × (n+1)`).
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// True when credentials are configured.
    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Looks up the blog mention count for an exhibition.
    ///
    /// The query is derived via the title normalizer and query builder,
    /// narrowed by the venue's first name token. HTTP 429 is retried with
    /// linear backoff; any other failure returns `None` immediately.
    pub async fn blog_count(&self, title: &str, place: &str) -> Option<u64> {
        let creds = self.credentials.as_ref()?;

        let search_title = extract_search_title(title);
        let query = build_query(&search_title, short_place(place));

        for attempt in 0..self.max_retries {
            let response = self
                .http
                .get(&self.endpoint)
                .query(&[("query", query.as_str()), ("display", "1")])
                .header(CLIENT_ID_HEADER, &creds.client_id)
                .header(CLIENT_SECRET_HEADER, &creds.client_secret)
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    log::warn!("blog search transport error for {title:?}: {err}");
                    return None;
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let wait = self.backoff_unit * (attempt as u32 + 1);
                log::warn!(
                    "blog search rate limited, waiting {}ms ({title})",
                    wait.as_millis()
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.status().is_success() {
                log::warn!("blog search error {} for: {title}", response.status());
                return None;
            }

            return match response.json::<BlogSearchResponse>().await {
                Ok(body) => Some(body.total),
                Err(err) => {
                    log::warn!("blog search returned undecodable body for {title:?}: {err}");
                    None
                }
            };
        }

        log::warn!(
            "blog search gave up after {} rate-limit retries: {title}",
            self.max_retries
        );
        None
    }
}

/// Recomputes `blog_count` for every record, sequentially with `pacing`
/// between lookups to stay under the API rate limit. Progress is logged
/// every ten records.
pub async fn refresh_blog_counts(
    client: &NaverClient,
    records: &mut [crate::model::Exhibition],
    pacing: Duration,
) {
    let total = records.len();
    for (i, record) in records.iter_mut().enumerate() {
        record.blog_count = client.blog_count(&record.title, &record.place).await;
        if (i + 1) % 10 == 0 || i + 1 == total {
            log::info!("blog counts: {}/{}", i + 1, total);
        }
        tokio::time::sleep(pacing).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn spawn_stub(fail_with_429: usize, hits: Arc<AtomicUsize>) -> String {
        let handler = move |State(hits): State<Arc<AtomicUsize>>| async move {
            let n = hits.fetch_add(1, Ordering::SeqCst);
            if n < fail_with_429 {
                Err(StatusCode::TOO_MANY_REQUESTS)
            } else {
                Ok(Json(serde_json::json!({ "total": 42 })))
            }
        };
        let app = Router::new()
            .route("/blog.json", get(handler))
            .with_state(hits);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub serve");
        });
        format!("http://{addr}/blog.json")
    }

    fn test_credentials() -> Option<NaverCredentials> {
        NaverCredentials::from_parts(Some("id".into()), Some("secret".into()))
    }

    #[test]
    fn credentials_require_both_parts() {
        assert!(NaverCredentials::from_parts(Some("id".into()), None).is_none());
        assert!(NaverCredentials::from_parts(None, Some("secret".into())).is_none());
        assert!(NaverCredentials::from_parts(Some("".into()), Some("secret".into())).is_none());
        assert!(test_credentials().is_some());
    }

    #[tokio::test]
    async fn disabled_client_skips_the_network() {
        let hits = Arc::new(AtomicUsize::new(0));
        let endpoint = spawn_stub(0, hits.clone()).await;

        let client = NaverClient::new(None).with_endpoint(endpoint);
        assert!(!client.is_enabled());
        assert_eq!(client.blog_count("단색화", "국제갤러리").await, None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rate_limit_then_success_returns_total() {
        let hits = Arc::new(AtomicUsize::new(0));
        let endpoint = spawn_stub(1, hits.clone()).await;

        let client = NaverClient::new(test_credentials())
            .with_endpoint(endpoint)
            .with_backoff_unit(Duration::from_millis(10));
        assert_eq!(client.blog_count("단색화", "국제갤러리").await, Some(42));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_rate_limit_retries_return_none() {
        let hits = Arc::new(AtomicUsize::new(0));
        let endpoint = spawn_stub(usize::MAX, hits.clone()).await;

        let client = NaverClient::new(test_credentials())
            .with_endpoint(endpoint)
            .with_max_retries(3)
            .with_backoff_unit(Duration::from_millis(5));
        assert_eq!(client.blog_count("단색화", "국제갤러리").await, None);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_success_status_is_not_retried() {
        let app = Router::new().route(
            "/blog.json",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub serve");
        });

        let client =
            NaverClient::new(test_credentials()).with_endpoint(format!("http://{addr}/blog.json"));
        assert_eq!(client.blog_count("단색화", "").await, None);
    }

    #[tokio::test]
    async fn transport_failure_returns_none() {
        // Nothing listens on this port; connect fails immediately.
        let client =
            NaverClient::new(test_credentials()).with_endpoint("http://127.0.0.1:9/blog.json");
        assert_eq!(client.blog_count("단색화", "").await, None);
    }

    #[tokio::test]
    async fn missing_total_defaults_to_zero() {
        let app = Router::new().route(
            "/blog.json",
            get(|| async { Json(serde_json::json!({ "items": [] })) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub serve");
        });

        let client = NaverClient::new(test_credentials())
            .with_endpoint(format!("http://{addr}/blog.json"));
        assert_eq!(client.blog_count("단색화", "").await, Some(0));
    }
}
