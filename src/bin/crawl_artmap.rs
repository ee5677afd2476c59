//! Crawls art-map.co.kr ongoing exhibitions, including venue GPS pages
//! and the inline blog-count pass, into the data file.

use anyhow::Result;
use artpulse::{artmap, store, Cli, CrawlContext};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let ctx = CrawlContext::new(cli.build_controls())?;
    let naver = cli.naver_client();
    let results = artmap::crawl(&ctx, &naver).await?;

    let written = store::persist_located(&cli.data_path, results)?;
    log::info!("saved {written} exhibitions to {}", cli.data_path.display());
    Ok(())
}
