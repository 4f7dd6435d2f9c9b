use chrono::{DateTime, Utc};
use dmc_core::{Error, FetchedArticle, Result};
use feed_rs::parser;
use futures::future::join_all;
use serde::Serialize;
use std::io::Cursor;

/// A configured RSS feed for one outlet.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub source_id: &'static str,
    pub source_name: &'static str,
    pub url: &'static str,
}

/// The feeds polled by default. The first entry is the primary feed served
/// by `/api/news`.
pub fn default_feeds() -> Vec<FeedSpec> {
    vec![
        FeedSpec {
            source_id: "ynet",
            source_name: "Ynet",
            url: "https://www.ynet.co.il/Integration/StoryRss2.xml",
        },
        FeedSpec {
            source_id: "walla",
            source_name: "Walla News",
            url: "https://rss.walla.co.il/feed/1",
        },
        FeedSpec {
            source_id: "maariv",
            source_name: "Maariv",
            url: "https://www.maariv.co.il/Rss/RssFeedsPolitiMedini",
        },
        FeedSpec {
            source_id: "israelhayom",
            source_name: "Israel Hayom",
            url: "https://www.israelhayom.co.il/rss.xml",
        },
        FeedSpec {
            source_id: "calcalist",
            source_name: "Calcalist",
            url: "https://www.calcalist.co.il/GeneralRSS/0,16335,L-8,00.xml",
        },
        FeedSpec {
            source_id: "globes",
            source_name: "Globes",
            url: "https://www.globes.co.il/webservice/rss/rssfeeder.asmx/FeederNode?iID=2",
        },
    ]
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RssItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub source: String,
}

impl RssItem {
    /// Converts a feed item into a fetchable article under the given
    /// category.
    pub fn into_fetched_article(self, category: &str) -> FetchedArticle {
        let content = if self.description.is_empty() {
            self.title.clone()
        } else {
            self.description.clone()
        };
        FetchedArticle {
            title: self.title,
            content,
            summary: None,
            url: self.link,
            image_url: self.image_url,
            source: self.source,
            category: category.to_string(),
            published_at: self.pub_date.unwrap_or_else(Utc::now),
        }
    }
}

/// Outcome of fetching one configured feed, in the per-source shape the
/// mobile shell consumes: every source reports either its items or its error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFetchResult {
    pub source: String,
    pub name: String,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RssItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Fulfilled,
    Rejected,
}

/// Parses raw feed bytes into items attributed to the given source.
pub fn parse_feed(bytes: &[u8], source_name: &str) -> Result<Vec<RssItem>> {
    let feed = parser::parse(Cursor::new(bytes))
        .map_err(|e| Error::Scraping(format!("Failed to parse feed: {}", e)))?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.as_ref().map(|t| t.content.trim().to_string())?;
            if title.is_empty() {
                return None;
            }
            let link = entry.links.first().map(|l| l.href.clone())?;
            let description = entry
                .summary
                .as_ref()
                .map(|s| s.content.trim().to_string())
                .unwrap_or_default();
            let image_url = entry
                .media
                .iter()
                .flat_map(|m| m.content.iter())
                .find_map(|c| c.url.as_ref().map(|u| u.to_string()));
            Some(RssItem {
                guid: entry.id.clone(),
                pub_date: entry.published.or(entry.updated),
                title,
                description,
                link,
                image_url,
                source: source_name.to_string(),
            })
        })
        .collect())
}

pub struct RssClient {
    client: reqwest::Client,
    feeds: Vec<FeedSpec>,
}

impl RssClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            feeds: default_feeds(),
        }
    }

    pub fn with_feeds(feeds: Vec<FeedSpec>) -> Self {
        Self {
            client: reqwest::Client::new(),
            feeds,
        }
    }

    pub fn feeds(&self) -> &[FeedSpec] {
        &self.feeds
    }

    pub async fn fetch_feed(&self, spec: &FeedSpec) -> Result<Vec<RssItem>> {
        let bytes = self
            .client
            .get(spec.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_feed(&bytes, spec.source_name)
    }

    /// Fetches the primary (first configured) feed.
    pub async fn fetch_primary(&self) -> Result<Vec<RssItem>> {
        let spec = self
            .feeds
            .first()
            .ok_or_else(|| Error::Scraping("No RSS feeds configured".to_string()))?;
        self.fetch_feed(spec).await
    }

    /// Fetches every configured feed concurrently. Failures never abort the
    /// batch: each source reports fulfilled-with-items or rejected-with-error.
    pub async fn fetch_all_settled(&self) -> Vec<SourceFetchResult> {
        let fetches = self.feeds.iter().map(|spec| async move {
            match self.fetch_feed(spec).await {
                Ok(items) => SourceFetchResult {
                    source: spec.source_id.to_string(),
                    name: spec.source_name.to_string(),
                    status: FetchStatus::Fulfilled,
                    items,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("feed {} failed: {}", spec.source_id, e);
                    SourceFetchResult {
                        source: spec.source_id.to_string(),
                        name: spec.source_name.to_string(),
                        status: FetchStatus::Rejected,
                        items: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            }
        });
        join_all(fetches).await
    }
}

impl Default for RssClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0">
          <channel>
            <title>Ynet - חדשות</title>
            <item>
              <title>הממשלה אישרה את התקציב החדש</title>
              <description>התקציב כולל השקעות בתשתיות, חינוך וביטחון</description>
              <link>https://www.ynet.co.il/news/article/budget</link>
              <guid>budget-2025</guid>
              <pubDate>Sun, 02 Mar 2025 10:30:00 +0200</pubDate>
              <enclosure url="https://img.ynet.co.il/budget.jpg" type="image/jpeg" length="1234"/>
            </item>
            <item>
              <title></title>
              <link>https://www.ynet.co.il/news/article/untitled</link>
            </item>
          </channel>
        </rss>"#;

    #[test]
    fn test_parse_feed() {
        let items = parse_feed(SAMPLE_RSS.as_bytes(), "Ynet").unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "הממשלה אישרה את התקציב החדש");
        assert_eq!(item.link, "https://www.ynet.co.il/news/article/budget");
        assert_eq!(item.source, "Ynet");
        assert!(item.pub_date.is_some());
        assert!(item.description.contains("תשתיות"));
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed(b"this is not xml", "Ynet").is_err());
    }

    #[test]
    fn test_item_to_fetched_article() {
        let items = parse_feed(SAMPLE_RSS.as_bytes(), "Ynet").unwrap();
        let article = items.into_iter().next().unwrap().into_fetched_article("politics");
        assert_eq!(article.category, "politics");
        assert_eq!(article.source, "Ynet");
        assert!(article.content.contains("השקעות"));
    }

    #[test]
    fn test_default_feeds_primary_is_ynet() {
        let feeds = default_feeds();
        assert_eq!(feeds[0].source_id, "ynet");
        assert!(feeds.len() > 1);
    }
}
