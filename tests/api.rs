//! End-to-end tests for the HTTP API against a real listener and a
//! scratch data file.

use std::path::PathBuf;

use artpulse::model::Exhibition;
use artpulse::naver::NaverClient;
use artpulse::serve::{router, ApiState};
use artpulse::store;
use axum::routing::get;
use axum::{Json, Router};

fn record(id: &str, end_date: &str, blog_count: Option<u64>) -> Exhibition {
    Exhibition {
        id: id.into(),
        title: format!("전시 {id}"),
        place: "갤러리".into(),
        address: "서울 종로구".into(),
        lat: 37.5,
        lng: 127.0,
        start_date: "2000-01-01".into(),
        end_date: end_date.into(),
        thumbnail: String::new(),
        blog_count,
    }
}

fn write_data_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("exhibitions.json");
    store::save(
        &path,
        &[
            record("ended", "2000-02-01", Some(5)),
            record("ongoing", "2999-12-31", Some(150)),
            record("open-ended", "", None),
        ],
    )
    .expect("write data file");
    path
}

async fn spawn_api(state: ApiState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind api");
    let addr = listener.local_addr().expect("api addr");
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn exhibitions_endpoint_serves_only_ongoing_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_data_file(&dir);
    let base = spawn_api(ApiState::new(path, NaverClient::new(None))).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/api/exhibitions"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");

    let items = body.as_array().expect("array response");
    let ids: Vec<&str> = items
        .iter()
        .map(|item| item["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["ongoing", "open-ended"]);

    for item in items {
        assert_eq!(item["category"], "전시");
        assert!(item["startDate"].is_string());
    }
    assert_eq!(items[0]["popularity"], "hot");
    assert_eq!(items[0]["blogCount"], 150);
    assert_eq!(items[1]["popularity"], "cold");
    assert!(items[1]["blogCount"].is_null());
}

#[tokio::test]
async fn blog_count_endpoint_requires_a_title() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_data_file(&dir);
    let base = spawn_api(ApiState::new(path, NaverClient::new(None))).await;

    let response = reqwest::get(format!("{base}/api/blog-count")).await.expect("request");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "title is required");
}

#[tokio::test]
async fn blog_count_endpoint_proxies_the_search_api() {
    // Stub standing in for the Naver blog-search endpoint.
    let stub = Router::new().route(
        "/blog.json",
        get(|| async { Json(serde_json::json!({ "total": 7 })) }),
    );
    let stub_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let stub_addr = stub_listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(stub_listener, stub).await.expect("stub serve");
    });

    let naver = NaverClient::new(artpulse::naver::NaverCredentials::from_parts(
        Some("id".into()),
        Some("secret".into()),
    ))
    .with_endpoint(format!("http://{stub_addr}/blog.json"));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_data_file(&dir);
    let base = spawn_api(ApiState::new(path, naver)).await;

    let body: serde_json::Value =
        reqwest::get(format!("{base}/api/blog-count?title=단색화&place=국제갤러리 서울"))
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");
    assert_eq!(body["total"], 7);

    // Disabled credentials surface as a null total, not an error.
    let dir2 = tempfile::tempdir().expect("tempdir");
    let path2 = write_data_file(&dir2);
    let base2 = spawn_api(ApiState::new(path2, NaverClient::new(None))).await;
    let body: serde_json::Value = reqwest::get(format!("{base2}/api/blog-count?title=단색화"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");
    assert!(body["total"].is_null());
}

#[tokio::test]
async fn healthz_responds_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_data_file(&dir);
    let base = spawn_api(ApiState::new(path, NaverClient::new(None))).await;

    let response = reqwest::get(format!("{base}/healthz")).await.expect("request");
    assert_eq!(response.status(), 200);
}
