//! HTTP API serving the exhibition data file and on-demand blog counts.
//!
//! The data file is read at request time; there is no caching layer, so a
//! crawl run that rewrites the file is visible on the next request.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::model::{Exhibition, PopularityLevel};
use crate::naver::NaverClient;
use crate::store;

/// Category label stamped onto every served record.
const CATEGORY: &str = "전시";

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    data_path: Arc<PathBuf>,
    naver: Arc<NaverClient>,
}

impl ApiState {
    /// Builds the state from the data-file path and a blog-search client.
    pub fn new(data_path: PathBuf, naver: NaverClient) -> Self {
        Self {
            data_path: Arc::new(data_path),
            naver: Arc::new(naver),
        }
    }
}

/// Builds the API router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/exhibitions", get(exhibitions))
        .route("/api/blog-count", get(blog_count))
        .with_state(state)
}

/// An exhibition as served to the map UI.
#[derive(Debug, Serialize)]
pub struct ApiExhibition {
    #[serde(flatten)]
    record: Exhibition,
    category: &'static str,
    popularity: PopularityLevel,
}

#[derive(Debug, Deserialize)]
struct BlogCountParams {
    title: Option<String>,
    place: Option<String>,
}

#[derive(Debug, Serialize)]
struct BlogCountResponse {
    total: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn exhibitions(
    State(state): State<ApiState>,
) -> Result<Json<Vec<ApiExhibition>>, (StatusCode, Json<ErrorBody>)> {
    let records = store::load(&state.data_path).map_err(internal_error)?;
    let today = chrono::Local::now().date_naive().to_string();

    let ongoing = records
        .into_iter()
        .filter(|record| record.is_ongoing(&today))
        .map(|record| ApiExhibition {
            popularity: PopularityLevel::from_count(record.blog_count),
            category: CATEGORY,
            record,
        })
        .collect();
    Ok(Json(ongoing))
}

async fn blog_count(
    State(state): State<ApiState>,
    Query(params): Query<BlogCountParams>,
) -> Result<Json<BlogCountResponse>, (StatusCode, Json<ErrorBody>)> {
    let title = match params.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => return Err(bad_request("title is required")),
    };
    let place = params.place.unwrap_or_default();

    let total = state.naver.blog_count(&title, &place).await;
    Ok(Json(BlogCountResponse { total }))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

fn internal_error(err: anyhow::Error) -> (StatusCode, Json<ErrorBody>) {
    log::error!("exhibitions request failed: {err:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: "failed to load exhibition data".to_string(),
        }),
    )
}
