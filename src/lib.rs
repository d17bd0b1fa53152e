pub mod api;
pub mod app_state;
pub mod config;
pub mod crawler;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod markdown;
pub mod normalize;
pub mod packaging;
pub mod sink;
pub mod structure;

pub use crawler::{CrawlJob, CrawlState, PagePipeline, PageRecord};
pub use markdown::convert;
