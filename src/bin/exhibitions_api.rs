//! HTTP API for the exhibition map UI.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use artpulse::naver::{NaverClient, NaverCredentials};
use artpulse::serve::{router, ApiState};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "exhibitions-api", about = "Serves exhibitions and blog counts over HTTP")]
struct ApiCli {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "ARTPULSE_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Path of the exhibition JSON data file
    #[arg(long, env = "ARTPULSE_DATA", default_value = "data/exhibitions.json")]
    data_path: PathBuf,

    /// Naver OpenAPI client id; blog counts are disabled when absent
    #[arg(long, env = "NAVER_CLIENT_ID")]
    naver_client_id: Option<String>,

    /// Naver OpenAPI client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET")]
    naver_client_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = ApiCli::parse();

    let credentials =
        NaverCredentials::from_parts(cli.naver_client_id, cli.naver_client_secret);
    let naver = NaverClient::new(credentials);
    if !naver.is_enabled() {
        log::warn!("no Naver credentials; /api/blog-count will return null totals");
    }

    let state = ApiState::new(cli.data_path, naver);
    let app = router(state);

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("exhibitions-api listening on http://{addr}");
    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}
