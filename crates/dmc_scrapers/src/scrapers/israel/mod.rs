use crate::scrapers::{Region, ScraperFactory};

pub mod ynet;

pub use ynet::YnetScraper;

pub const REGION: Region = Region { name: "israel" };

/// Returns factories for all available Israeli news scrapers
pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    vec![Box::new(|| Box::new(YnetScraper::new()))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::Scraper;

    #[test]
    fn test_factories_cover_known_urls() {
        let factories = get_scraper_factories();
        assert!(!factories.is_empty());

        let ynet_url = "https://www.ynet.co.il/news/article/abc123";
        assert!(factories.iter().any(|f| f().can_handle(ynet_url)));
    }
}
