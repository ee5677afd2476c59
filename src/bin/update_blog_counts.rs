//! Recomputes blog counts for the existing data file without re-crawling.

use std::time::Duration;

use anyhow::{bail, Result};
use artpulse::naver::refresh_blog_counts;
use artpulse::{store, Cli};
use clap::Parser;

const PACING: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let naver = cli.naver_client();
    if !naver.is_enabled() {
        bail!("NAVER_CLIENT_ID / NAVER_CLIENT_SECRET not set");
    }

    let mut exhibitions = store::load(&cli.data_path)?;
    log::info!("updating blog counts for {} exhibitions", exhibitions.len());

    refresh_blog_counts(&naver, &mut exhibitions, PACING).await;

    store::save(&cli.data_path, &exhibitions)?;
    log::info!("done, updated {} exhibitions", exhibitions.len());
    Ok(())
}
