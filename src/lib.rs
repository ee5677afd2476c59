#![warn(missing_docs)]
//! Core library entry points for the artpulse exhibition pipeline.
//!
//! The crate crawls two Seoul gallery-listing sites into a JSON file of
//! exhibition records, enriches them with Naver blog mention counts, and
//! serves the ongoing exhibitions over HTTP for the map UI.

pub mod artmap;
pub mod controls;
pub mod crawler;
pub mod html;
pub mod model;
pub mod naver;
pub mod normalizer;
pub mod opengallery;
pub mod serve;
pub mod store;

pub use controls::{Cli, CrawlControls};
pub use crawler::CrawlContext;
pub use model::{Exhibition, PopularityLevel};
pub use naver::{NaverClient, NaverCredentials};
pub use normalizer::{build_query, extract_search_title, short_place};
