use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use dmc_core::{FetchedArticle, Result};
use dmc_inference::models::heuristic;
use scraper::{ElementRef, Html, Selector};

use super::REGION;
use crate::scrapers::{utils, Scraper, SourceMetadata};

const TEASER_CHARS: usize = 200;

/// Scraper for Ynet section pages. Section markup varies between templates,
/// so parsing runs a sequence of fallback selector strategies.
#[derive(Debug, Clone)]
pub struct YnetScraper;

impl YnetScraper {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://www.ynet.co.il";

    /// Maps aggregator categories onto Ynet section slugs.
    pub fn section_for_category(category: &str) -> &'static str {
        match category {
            "politics" => "news",
            "business" => "economy",
            "technology" => "digital",
            "entertainment" => "entertainment",
            "sports" => "sport",
            "health" => "health",
            "security" => "news",
            _ => "news",
        }
    }

    /// Parses a section page into articles, trying each selector strategy in
    /// turn and deduplicating by URL.
    pub fn parse_section(html: &str, category: &str) -> Vec<FetchedArticle> {
        let document = Html::parse_document(html);
        let mut articles = Vec::new();
        let mut seen_urls = HashSet::new();

        let slot_view = Selector::parse(".slotView").unwrap();
        let slot_title = Selector::parse(".slotTitle").unwrap();
        let slot_texts = Selector::parse(".slotSubTitle, .teaserText").unwrap();
        for element in document.select(&slot_view) {
            Self::collect_article(
                element,
                &slot_title,
                &slot_texts,
                category,
                &mut seen_urls,
                &mut articles,
            );
        }

        let strip_item = Selector::parse(".YnetMultiStripComponenta li").unwrap();
        let strip_title = Selector::parse("h2, .title").unwrap();
        let strip_texts = Selector::parse(".subtitle, .text, p").unwrap();
        for element in document.select(&strip_item) {
            Self::collect_article(
                element,
                &strip_title,
                &strip_texts,
                category,
                &mut seen_urls,
                &mut articles,
            );
        }

        let generic_item = Selector::parse("article, .article, .news-item, .layoutItem").unwrap();
        let generic_title = Selector::parse("h1, h2, h3, .title, .headline").unwrap();
        let generic_texts = Selector::parse("p, .abstract, .summary, .subtitle, .text").unwrap();
        for element in document.select(&generic_item) {
            Self::collect_article(
                element,
                &generic_title,
                &generic_texts,
                category,
                &mut seen_urls,
                &mut articles,
            );
        }

        articles
    }

    fn collect_article(
        element: ElementRef,
        title_selector: &Selector,
        text_selector: &Selector,
        category: &str,
        seen_urls: &mut HashSet<String>,
        articles: &mut Vec<FetchedArticle>,
    ) {
        let title = match element.select(title_selector).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => return,
        };
        if title.is_empty() {
            return;
        }

        let link_selector = Selector::parse("a").unwrap();
        let url = element
            .select(&link_selector)
            .find_map(|a| a.value().attr("href"))
            .map(|href| utils::absolutize(Self::BASE_URL, href));
        let url = match url {
            Some(url) => url,
            None => return,
        };
        if !seen_urls.insert(url.clone()) {
            return;
        }

        let img_selector = Selector::parse("img").unwrap();
        let image_url = element.select(&img_selector).next().and_then(|img| {
            img.value()
                .attr("src")
                .or_else(|| img.value().attr("data-src"))
                .map(|src| utils::absolutize(Self::BASE_URL, src))
        });

        let mut content = element
            .select(text_selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if content.chars().count() < 10 {
            content = format!("{} - כותרת מאתר Ynet", title);
        }

        // Outside the politics section only politically relevant items are
        // kept; the aggregator is a political news product.
        let full_text = format!("{} {}", title, content);
        if category != "politics" && !heuristic::is_political(&full_text) {
            return;
        }

        articles.push(FetchedArticle {
            summary: Some(utils::teaser(&content, TEASER_CHARS)),
            title,
            content,
            url,
            image_url,
            source: "Ynet".to_string(),
            category: category.to_string(),
            published_at: Utc::now(),
        });
    }
}

impl Default for YnetScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for YnetScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "ynet",
            name: "Ynet",
            emoji: "📰",
            region: REGION,
        }
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("ynet.co.il")
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["ynet"]
    }

    async fn fetch_category(&self, category: &str) -> Result<Vec<FetchedArticle>> {
        let section = Self::section_for_category(category);
        let url = format!("{}/{}", Self::BASE_URL, section);
        let response = reqwest::get(&url).await?;
        let html = response.text().await?;
        Ok(Self::parse_section(&html, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_handle() {
        let scraper = YnetScraper::new();
        assert!(scraper.can_handle("https://www.ynet.co.il/news/article/1"));
        assert!(!scraper.can_handle("https://news.walla.co.il/item/1"));
    }

    #[test]
    fn test_section_mapping() {
        assert_eq!(YnetScraper::section_for_category("politics"), "news");
        assert_eq!(YnetScraper::section_for_category("business"), "economy");
        assert_eq!(YnetScraper::section_for_category("sports"), "sport");
        assert_eq!(YnetScraper::section_for_category("unknown"), "news");
    }

    #[test]
    fn test_parse_slot_view_strategy() {
        let html = r#"
            <div class="slotView">
                <a href="/news/article/budget2025"></a>
                <div class="slotTitle">הממשלה אישרה את התקציב החדש</div>
                <div class="slotSubTitle">התקציב כולל השקעות בתשתיות ובחינוך</div>
                <img src="//img.ynet.co.il/budget.jpg" />
            </div>
        "#;
        let articles = YnetScraper::parse_section(html, "politics");
        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.title, "הממשלה אישרה את התקציב החדש");
        assert_eq!(article.url, "https://www.ynet.co.il/news/article/budget2025");
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://img.ynet.co.il/budget.jpg")
        );
        assert!(article.content.contains("השקעות בתשתיות"));
    }

    #[test]
    fn test_parse_strip_strategy() {
        let html = r#"
            <div class="YnetMultiStripComponenta">
                <ul>
                    <li>
                        <a href="https://www.ynet.co.il/news/article/coalition"></a>
                        <h2>משבר בקואליציה סביב חוק הגיוס</h2>
                        <div class="subtitle">ראש הממשלה יכנס את ראשי המפלגות</div>
                    </li>
                </ul>
            </div>
        "#;
        let articles = YnetScraper::parse_section(html, "politics");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "משבר בקואליציה סביב חוק הגיוס");
    }

    #[test]
    fn test_parse_generic_strategy() {
        let html = r#"
            <article>
                <a href="/news/article/generic1"></a>
                <h3>הכנסת דנה בהצעת חוק חדשה</h3>
                <p>ההצעה עברה בקריאה ראשונה ברוב של 61 תומכים</p>
            </article>
        "#;
        let articles = YnetScraper::parse_section(html, "politics");
        assert_eq!(articles.len(), 1);
        assert!(articles[0].content.contains("קריאה ראשונה"));
    }

    #[test]
    fn test_duplicate_urls_collapse_across_strategies() {
        let html = r#"
            <div class="slotView">
                <a href="/news/article/same"></a>
                <div class="slotTitle">כותרת זהה</div>
            </div>
            <article>
                <a href="/news/article/same"></a>
                <h2>כותרת זהה</h2>
            </article>
        "#;
        let articles = YnetScraper::parse_section(html, "politics");
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_titleless_blocks_are_skipped() {
        let html = r#"<div class="slotView"><a href="/x"></a></div>"#;
        assert!(YnetScraper::parse_section(html, "politics").is_empty());
    }

    #[test]
    fn test_short_content_falls_back_to_title_stub() {
        let html = r#"
            <div class="slotView">
                <a href="/news/article/stub"></a>
                <div class="slotTitle">הממשלה התכנסה לישיבה מיוחדת</div>
            </div>
        "#;
        let articles = YnetScraper::parse_section(html, "politics");
        assert_eq!(articles.len(), 1);
        assert!(articles[0].content.ends_with("כותרת מאתר Ynet"));
    }

    #[test]
    fn test_non_political_items_dropped_outside_politics() {
        let html = r#"
            <div class="slotView">
                <a href="/health/article/recipe"></a>
                <div class="slotTitle">מתכון מרענן לקיץ</div>
                <div class="slotSubTitle">סלט פירות עם נענע ולימון</div>
            </div>
            <div class="slotView">
                <a href="/health/article/minister"></a>
                <div class="slotTitle">שר הבריאות הציג רפורמה חדשה</div>
                <div class="slotSubTitle">הרפורמה תקצר את התורים לניתוחים</div>
            </div>
        "#;
        let articles = YnetScraper::parse_section(html, "health");
        assert_eq!(articles.len(), 1);
        assert!(articles[0].title.contains("שר הבריאות"));
    }
}
