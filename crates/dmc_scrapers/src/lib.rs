pub mod manager;
pub mod rss;
pub mod samples;
pub mod scrapers;
pub mod topics;

pub use manager::{RefreshSummary, ScraperManager};
pub use rss::{RssClient, RssItem, SourceFetchResult};
