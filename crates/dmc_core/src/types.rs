use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub category: String,
    pub published_at: DateTime<Utc>,
    pub topic_id: i64,
}

/// Article fields without an id, used for upserts. An existing article with
/// the same URL is updated in place instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub category: String,
    pub published_at: DateTime<Utc>,
    pub topic_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Politician {
    pub id: i64,
    pub name: String,
    pub party: String,
    pub position: String,
    pub image_url: Option<String>,
    pub mention_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPolitician {
    pub name: String,
    pub party: String,
    pub position: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub id: i64,
    pub politician_id: i64,
    pub article_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    pub politician_id: i64,
    pub user_id: Option<i64>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub politician_id: i64,
    pub user_id: Option<i64>,
    pub rating: i32,
    pub comment: Option<String>,
}

/// A scraped or feed-derived article before it has been assigned to a topic
/// and persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub category: String,
    pub published_at: DateTime<Utc>,
}

impl FetchedArticle {
    pub fn into_new_article(self, topic_id: i64) -> NewArticle {
        NewArticle {
            title: self.title,
            content: self.content,
            summary: self.summary,
            url: self.url,
            image_url: self.image_url,
            source: self.source,
            category: self.category,
            published_at: self.published_at,
            topic_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// A topic joined with its articles and the politicians mentioned in them,
/// each carrying their current average rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicWithArticles {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub updated_at: DateTime<Utc>,
    pub articles: Vec<Article>,
    pub politicians: Vec<PoliticianWithRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticianWithRating {
    #[serde(flatten)]
    pub politician: Politician,
    pub average_rating: f64,
    pub total_ratings: usize,
}
