//! Crawler for opengallery.co.kr ongoing exhibitions.
//!
//! Listing pages are walked by incrementing the `p` parameter; every field
//! of a detail page comes from meta tags or `djContext` script variables,
//! so extraction is pure regex over the raw HTML.

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use crate::crawler::{fetch_bounded, CrawlContext, ListAccumulator};
use crate::html::{capture, clean_text, require, ExtractError};
use crate::model::Exhibition;

const LIST_URL: &str = "https://www.opengallery.co.kr/exhibition/?status=ongoing&p=";
const DETAIL_URL: &str = "https://www.opengallery.co.kr/exhibition/";
const TITLE_SITE_SUFFIX: &str = " 전시 정보 :: 오픈갤러리";

fn regex(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"href="/exhibition/(\d+)/""#)
}

fn og_title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"<meta property="og:title" content="([^"]*)""#)
}

fn og_description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"<meta property="og:description" content="([^"]*)""#)
}

fn og_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"<meta property="og:image" content="([^"]*)""#)
}

fn latitude_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"djContext\.locationLatitude\s*=\s*([0-9.]+)")
}

fn longitude_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"djContext\.locationLongitude\s*=\s*([0-9.]+)")
}

fn place_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"djContext\.locationName\s*=\s*'([^']*)'")
}

fn date_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(\d{4}-\d{2}-\d{2})\s*~\s*(\d{4}-\d{2}-\d{2})")
}

/// Walks listing pages until a page adds no new ids or the page cap is
/// reached, returning exhibition ids in discovery order.
pub async fn discover_ids(ctx: &CrawlContext) -> Result<Vec<String>> {
    let mut acc = ListAccumulator::new();
    for page in 1..=ctx.controls().max_list_pages() {
        let html = ctx.fetch_text(&format!("{LIST_URL}{page}")).await?;
        let before = acc.len();
        for caps in id_re().captures_iter(&html) {
            let id = &caps[1];
            acc.insert(id, id.to_string());
        }
        log::info!("opengallery list page {page}: {} exhibitions", acc.len());
        if acc.len() == before {
            break;
        }
    }
    Ok(acc.into_items())
}

/// Parses a detail page. `Ok(None)` means the page had no usable title
/// and the item should be skipped silently.
pub fn parse_detail(id: &str, html: &str) -> Result<Option<Exhibition>, ExtractError> {
    let og_title = require(html, og_title_re(), "og:title")?;
    let title = og_title.strip_suffix(TITLE_SITE_SUFFIX).unwrap_or(og_title);
    let title = title.strip_prefix('\'').unwrap_or(title);
    let title = title.strip_suffix('\'').unwrap_or(title).to_string();
    if title.is_empty() {
        return Ok(None);
    }

    let lat: f64 = capture(html, latitude_re())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    let lng: f64 = capture(html, longitude_re())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);

    let place = capture(html, place_re()).unwrap_or("").trim().to_string();

    // og:description looks like "[서울] 장소 | 2025-12-20 ~ 2026-03-29".
    let description = capture(html, og_description_re()).unwrap_or("");
    let (start_date, end_date) = match date_range_re().captures(description) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), String::new()),
    };

    let thumbnail = capture(html, og_image_re()).unwrap_or("").to_string();

    // The site exposes no street address; the venue name stands in.
    let place = clean_text(&place);
    Ok(Some(Exhibition {
        id: id.to_string(),
        title: clean_text(&title),
        address: place.clone(),
        place,
        lat,
        lng,
        start_date,
        end_date,
        thumbnail,
        blog_count: None,
    }))
}

/// Fetches and parses one detail page, logging and skipping on failure.
async fn fetch_detail(ctx: &CrawlContext, id: String) -> Option<Exhibition> {
    let url = format!("{DETAIL_URL}{id}/");
    let html = match ctx.fetch_text(&url).await {
        Ok(html) => html,
        Err(err) => {
            log::warn!("skipping opengallery id={id}: {err:#}");
            return None;
        }
    };
    match parse_detail(&id, &html) {
        Ok(record) => record,
        Err(err) => {
            log::warn!("skipping opengallery id={id}: {err}");
            None
        }
    }
}

/// Full crawl: list discovery then bounded-concurrency detail fetches.
/// Returned records are unfiltered; the store drops unlocated ones.
pub async fn crawl(ctx: &CrawlContext) -> Result<Vec<Exhibition>> {
    let ids = discover_ids(ctx).await?;
    log::info!("found {} opengallery exhibitions", ids.len());

    let results = fetch_bounded(ids, ctx.controls().detail_concurrency(), |id| {
        fetch_detail(ctx, id)
    })
    .await;
    Ok(results)
}
