//! Crawler for art-map.co.kr ongoing exhibitions.
//!
//! Listing pages are walked by incrementing a page parameter (the site's
//! infinite scroll fetches the same pages). Venue GPS lives on a separate
//! gallery page, so lookups are cached per gallery id for the duration of
//! a run. This crawl also runs the blog-count pass inline, sequentially,
//! to stay under the Naver rate limit.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};
use tokio::sync::Mutex;

use crate::crawler::{fetch_bounded, CrawlContext, ListAccumulator};
use crate::html::{capture, ExtractError};
use crate::model::Exhibition;
use crate::naver::{refresh_blog_counts, NaverClient};

const BASE_URL: &str = "https://art-map.co.kr";
const LIST_URL: &str = "https://art-map.co.kr/exhibition/new_list.php?type=ing&page=";
const DETAIL_URL: &str = "https://art-map.co.kr/exhibition/view.php?idx=";
const GALLERY_URL: &str = "https://art-map.co.kr/gallery/view.php?idx=";

/// Pause between sequential blog-count lookups.
const BLOG_COUNT_PACING: Duration = Duration::from_millis(100);

/// One listing entry: the detail id plus the thumbnail only the listing
/// page exposes.
#[derive(Debug, Clone)]
pub struct ListItem {
    /// Site-native exhibition id (`view.php?idx=`).
    pub idx: String,
    /// Thumbnail URL as found on the listing page, possibly relative.
    pub thumbnail: String,
}

/// Venue coordinates and address scraped from a gallery page. Zeroed
/// coordinates mean the page had no usable map call.
#[derive(Debug, Clone, Default)]
pub struct VenueLocation {
    /// Latitude, 0.0 when unknown.
    pub lat: f64,
    /// Longitude, 0.0 when unknown.
    pub lng: f64,
    /// Street address, empty when unknown.
    pub address: String,
}

/// Per-run cache of venue locations keyed by gallery id.
pub type VenueCache = Mutex<HashMap<String, VenueLocation>>;

fn idx_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"idx=(\d+)").unwrap())
}

fn title_date_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([\d.\s-]+\)\s*$").unwrap())
}

fn date_cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4}\.\d{2}\.\d{2})\s*-\s*(\d{4}\.\d{2}\.\d{2})").unwrap())
}

fn init_map_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"initMap\("([^"]+)","([^"]+)","([^"]*)","([^"]*)""#).unwrap())
}

/// Extracts listing entries from one list page, in document order.
pub fn parse_list(html: &str) -> Vec<ListItem> {
    let doc = Html::parse_document(html);
    let anchor_sel = Selector::parse(r#"a[href*="view.php?idx="]"#).unwrap();
    let img_sel = Selector::parse("img").unwrap();

    let mut items = Vec::new();
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        // Gallery links use the same view.php shape; only exhibition links
        // appear on the listing page.
        let Some(idx) = capture(href, idx_re()) else {
            continue;
        };
        let thumbnail = anchor
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or("")
            .to_string();
        items.push(ListItem {
            idx: idx.to_string(),
            thumbnail,
        });
    }
    items
}

/// Fields scraped from an exhibition detail page.
#[derive(Debug, Clone)]
pub struct DetailFields {
    /// Display title with the trailing date range removed.
    pub title: String,
    /// Venue name as linked on the page, unstripped.
    pub place: String,
    /// Gallery id for the GPS lookup, when the page links one.
    pub gallery_idx: Option<String>,
    /// ISO start date, empty when no date cell matched.
    pub start_date: String,
    /// ISO end date, empty when no date cell matched.
    pub end_date: String,
}

/// Parses an exhibition detail page into its typed fields.
pub fn parse_detail(html: &str) -> Result<DetailFields, ExtractError> {
    let doc = Html::parse_document(html);

    let title_sel = Selector::parse("title").unwrap();
    let raw_title = doc
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or(ExtractError::MissingField { field: "title" })?;
    // Page titles carry the run dates: "전시명 (2026.02.13 - 2026.03.28)".
    let title = title_date_suffix_re()
        .replace(&raw_title, "")
        .trim()
        .to_string();

    let gallery_sel = Selector::parse(r#"a[href*="gallery/view.php?idx="]"#).unwrap();
    let (gallery_idx, place) = match doc.select(&gallery_sel).next() {
        Some(anchor) => {
            let idx = anchor
                .value()
                .attr("href")
                .and_then(|href| capture(href, idx_re()))
                .map(str::to_string);
            let place = anchor.text().collect::<String>().trim().to_string();
            (idx, place)
        }
        None => (None, String::new()),
    };

    let td_sel = Selector::parse("td").unwrap();
    let mut start_date = String::new();
    let mut end_date = String::new();
    for cell in doc.select(&td_sel) {
        let text = cell.text().collect::<String>();
        if let Some(caps) = date_cell_re().captures(&text) {
            start_date = caps[1].replace('.', "-");
            end_date = caps[2].replace('.', "-");
            break;
        }
    }

    Ok(DetailFields {
        title,
        place,
        gallery_idx,
        start_date,
        end_date,
    })
}

/// Pulls coordinates and address out of a gallery page's `initMap` call.
/// Pages without the call yield the zeroed sentinel.
pub fn parse_venue_location(html: &str) -> VenueLocation {
    match init_map_re().captures(html) {
        Some(caps) => VenueLocation {
            lat: caps[1].parse().unwrap_or(0.0),
            lng: caps[2].parse().unwrap_or(0.0),
            address: caps[4].trim().to_string(),
        },
        None => VenueLocation::default(),
    }
}

/// Strips the trailing "/region" qualifier from a venue name.
pub fn strip_region(place: &str) -> String {
    match place.rfind('/') {
        Some(idx) => place[..idx].trim().to_string(),
        None => place.trim().to_string(),
    }
}

fn absolutize_thumbnail(thumbnail: &str) -> String {
    if thumbnail.is_empty() || thumbnail.starts_with("http") {
        thumbnail.to_string()
    } else {
        format!("{BASE_URL}{thumbnail}")
    }
}

/// Walks listing pages until a page adds no new entries or the page cap
/// is reached.
pub async fn discover_items(ctx: &CrawlContext) -> Result<Vec<ListItem>> {
    let mut acc = ListAccumulator::new();
    for page in 1..=ctx.controls().max_list_pages() {
        let html = ctx.fetch_text(&format!("{LIST_URL}{page}")).await?;
        let before = acc.len();
        for item in parse_list(&html) {
            let idx = item.idx.clone();
            acc.insert(&idx, item);
        }
        log::info!("artmap list page {page}: {} exhibitions", acc.len());
        if acc.len() == before {
            break;
        }
    }
    Ok(acc.into_items())
}

/// Cached venue lookup against an explicit URL; exposed for tests.
pub(crate) async fn venue_location_at(
    ctx: &CrawlContext,
    cache: &VenueCache,
    url: &str,
    gallery_idx: &str,
) -> VenueLocation {
    if let Some(found) = cache.lock().await.get(gallery_idx) {
        return found.clone();
    }
    let location = match ctx.fetch_text(url).await {
        Ok(html) => parse_venue_location(&html),
        Err(err) => {
            log::warn!("venue lookup failed for gallery {gallery_idx}: {err:#}");
            VenueLocation::default()
        }
    };
    cache
        .lock()
        .await
        .insert(gallery_idx.to_string(), location.clone());
    location
}

async fn venue_location(
    ctx: &CrawlContext,
    cache: &VenueCache,
    gallery_idx: &str,
) -> VenueLocation {
    let url = format!("{GALLERY_URL}{gallery_idx}");
    venue_location_at(ctx, cache, &url, gallery_idx).await
}

/// Fetches one exhibition's detail page plus its venue location, logging
/// and skipping on failure.
async fn fetch_detail(ctx: &CrawlContext, cache: &VenueCache, item: ListItem) -> Option<Exhibition> {
    let html = match ctx.fetch_text(&format!("{DETAIL_URL}{}", item.idx)).await {
        Ok(html) => html,
        Err(err) => {
            log::warn!("skipping artmap idx={}: {err:#}", item.idx);
            return None;
        }
    };
    let fields = match parse_detail(&html) {
        Ok(fields) => fields,
        Err(err) => {
            log::warn!("skipping artmap idx={}: {err}", item.idx);
            return None;
        }
    };

    let location = match &fields.gallery_idx {
        Some(gallery_idx) => venue_location(ctx, cache, gallery_idx).await,
        None => VenueLocation::default(),
    };

    let place = strip_region(&fields.place);
    let address = if location.address.is_empty() {
        place.clone()
    } else {
        location.address
    };

    Some(Exhibition {
        id: item.idx,
        title: fields.title,
        place,
        address,
        lat: location.lat,
        lng: location.lng,
        start_date: fields.start_date,
        end_date: fields.end_date,
        thumbnail: absolutize_thumbnail(&item.thumbnail),
        blog_count: None,
    })
}

/// Full crawl: list discovery, bounded detail fetches with a per-run
/// venue cache, then the inline blog-count pass. Returned records are
/// unfiltered; the store drops unlocated ones.
pub async fn crawl(ctx: &CrawlContext, naver: &NaverClient) -> Result<Vec<Exhibition>> {
    let items = discover_items(ctx).await?;
    log::info!("found {} artmap exhibitions", items.len());

    let cache: VenueCache = Mutex::new(HashMap::new());
    let mut results = fetch_bounded(items, ctx.controls().detail_concurrency(), |item| {
        fetch_detail(ctx, &cache, item)
    })
    .await;

    if naver.is_enabled() {
        log::info!("fetching blog counts for {} exhibitions", results.len());
        refresh_blog_counts(naver, &mut results, BLOG_COUNT_PACING).await;
    } else {
        log::info!("blog counts disabled (no Naver credentials)");
    }
    Ok(results)
}
