//! Crawls opengallery.co.kr ongoing exhibitions into the data file.

use anyhow::Result;
use artpulse::{opengallery, store, Cli, CrawlContext};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let ctx = CrawlContext::new(cli.build_controls())?;
    let results = opengallery::crawl(&ctx).await?;

    let written = store::persist_located(&cli.data_path, results)?;
    log::info!("saved {written} exhibitions to {}", cli.data_path.display());
    Ok(())
}
