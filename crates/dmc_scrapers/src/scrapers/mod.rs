use async_trait::async_trait;
use dmc_core::{Error, FetchedArticle, Result};
use scraper::{Html, Selector};
use url::Url;

pub mod israel;

/// The geographic region a scraper covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns identifying metadata for the news source
    fn source_metadata(&self) -> SourceMetadata;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Fetches and parses the section page for the given category
    async fn fetch_category(&self, category: &str) -> Result<Vec<FetchedArticle>>;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }
}

pub type ScraperFactory = Box<dyn Fn() -> Box<dyn Scraper> + Send + Sync>;

pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    israel::get_scraper_factories()
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;

    #[allow(dead_code)]
    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::Scraping(format!("Failed to parse URL: {}", e)))
    }

    #[allow(dead_code)]
    pub fn extract_text(document: &Html, selector: &str) -> Result<String> {
        let selector = Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector: {}", e)))?;

        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or_else(|| Error::Scraping(format!("No element found for selector: {:?}", selector)))
    }

    /// Resolves a possibly relative or protocol-relative link against a base.
    pub fn absolutize(base: &str, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with("//") {
            format!("https:{}", href)
        } else {
            format!("{}{}", base.trim_end_matches('/'), href)
        }
    }

    /// Truncates content to the short teaser stored alongside new articles.
    pub fn teaser(content: &str, max_chars: usize) -> String {
        if content.chars().count() > max_chars {
            let cut: String = content.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            content.to_string()
        }
    }
}
