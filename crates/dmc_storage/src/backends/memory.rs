use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dmc_core::catalog;
use dmc_core::types::{
    Article, Category, Mention, NewArticle, NewPolitician, NewRating, NewTopic, Politician,
    PoliticianWithRating, Rating, Source, Topic, TopicWithArticles,
};
use dmc_core::{Error, NewsStorage, Result};
use tokio::sync::RwLock;

use crate::StorageBackend;

/// How many leading chars of a topic title participate in the
/// same-topic match during upserts.
const TOPIC_MATCH_PREFIX_CHARS: usize = 20;

pub struct MemoryStore {
    articles: HashMap<i64, Article>,
    topics: HashMap<i64, Topic>,
    politicians: HashMap<i64, Politician>,
    mentions: HashMap<i64, Mention>,
    ratings: HashMap<i64, Rating>,
    article_id: i64,
    topic_id: i64,
    politician_id: i64,
    mention_id: i64,
    rating_id: i64,
    sources: Vec<Source>,
    categories: Vec<Category>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            articles: HashMap::new(),
            topics: HashMap::new(),
            politicians: HashMap::new(),
            mentions: HashMap::new(),
            ratings: HashMap::new(),
            article_id: 1,
            topic_id: 1,
            politician_id: 1,
            mention_id: 1,
            rating_id: 1,
            sources: catalog::default_sources(),
            categories: catalog::default_categories(),
        }
    }

    fn upsert_article(&mut self, article: NewArticle) -> Article {
        if let Some(existing) = self.articles.values_mut().find(|a| a.url == article.url) {
            existing.title = article.title;
            existing.content = article.content;
            existing.summary = article.summary;
            existing.image_url = article.image_url;
            existing.source = article.source;
            existing.category = article.category;
            existing.published_at = article.published_at;
            existing.topic_id = article.topic_id;
            return existing.clone();
        }

        let id = self.article_id;
        self.article_id += 1;
        let stored = Article {
            id,
            title: article.title,
            content: article.content,
            summary: article.summary,
            url: article.url,
            image_url: article.image_url,
            source: article.source,
            category: article.category,
            published_at: article.published_at,
            topic_id: article.topic_id,
        };
        self.articles.insert(id, stored.clone());
        stored
    }

    fn upsert_topic(&mut self, topic: NewTopic) -> Topic {
        let prefix: String = topic.title.chars().take(TOPIC_MATCH_PREFIX_CHARS).collect();
        let matching = self
            .topics
            .values_mut()
            .find(|t| t.category == topic.category && t.title.contains(&prefix));

        if let Some(existing) = matching {
            existing.title = topic.title;
            existing.summary = topic.summary;
            existing.updated_at = topic.updated_at;
            return existing.clone();
        }

        let id = self.topic_id;
        self.topic_id += 1;
        let stored = Topic {
            id,
            title: topic.title,
            summary: topic.summary,
            category: topic.category,
            updated_at: topic.updated_at,
        };
        self.topics.insert(id, stored.clone());
        stored
    }

    fn upsert_politician(&mut self, politician: NewPolitician) -> Politician {
        let name_lower = politician.name.to_lowercase();
        let matching = self
            .politicians
            .values_mut()
            .find(|p| p.name.to_lowercase() == name_lower);

        if let Some(existing) = matching {
            existing.party = politician.party;
            existing.position = politician.position;
            if politician.image_url.is_some() {
                existing.image_url = politician.image_url;
            }
            return existing.clone();
        }

        let id = self.politician_id;
        self.politician_id += 1;
        let stored = Politician {
            id,
            name: politician.name,
            party: politician.party,
            position: politician.position,
            image_url: politician.image_url,
            mention_count: 0,
        };
        self.politicians.insert(id, stored.clone());
        stored
    }

    fn add_mention(&mut self, politician_id: i64, article_id: i64) -> Mention {
        if let Some(existing) = self
            .mentions
            .values()
            .find(|m| m.politician_id == politician_id && m.article_id == article_id)
        {
            return existing.clone();
        }

        let id = self.mention_id;
        self.mention_id += 1;
        let mention = Mention {
            id,
            politician_id,
            article_id,
        };
        self.mentions.insert(id, mention.clone());
        if let Some(politician) = self.politicians.get_mut(&politician_id) {
            politician.mention_count += 1;
        }
        mention
    }

    fn average_rating(&self, politician_id: i64) -> f64 {
        let ratings: Vec<_> = self
            .ratings
            .values()
            .filter(|r| r.politician_id == politician_id)
            .collect();
        if ratings.is_empty() {
            return 0.0;
        }
        ratings.iter().map(|r| r.rating as f64).sum::<f64>() / ratings.len() as f64
    }

    fn with_rating(&self, politician: &Politician) -> PoliticianWithRating {
        let total = self
            .ratings
            .values()
            .filter(|r| r.politician_id == politician.id)
            .count();
        PoliticianWithRating {
            politician: politician.clone(),
            average_rating: self.average_rating(politician.id),
            total_ratings: total,
        }
    }

    fn topic_with_articles(&self, topic: &Topic) -> TopicWithArticles {
        let mut articles: Vec<Article> = self
            .articles
            .values()
            .filter(|a| a.topic_id == topic.id)
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let mut politician_ids: Vec<i64> = self
            .mentions
            .values()
            .filter(|m| articles.iter().any(|a| a.id == m.article_id))
            .map(|m| m.politician_id)
            .collect();
        politician_ids.sort_unstable();
        politician_ids.dedup();

        let politicians = politician_ids
            .iter()
            .filter_map(|id| self.politicians.get(id))
            .map(|p| self.with_rating(p))
            .collect();

        TopicWithArticles {
            id: topic.id,
            title: topic.title.clone(),
            summary: topic.summary.clone(),
            category: topic.category.clone(),
            updated_at: topic.updated_at,
            articles,
            politicians,
        }
    }

    fn topics_sorted(&self, category: Option<&str>) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self
            .topics
            .values()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .cloned()
            .collect();
        topics.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        topics
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        })
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should always be available"
    }

    async fn new() -> Result<Self> {
        Self::new().await
    }
}

#[async_trait]
impl NewsStorage for MemoryStorage {
    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.articles.get(&id).cloned())
    }

    async fn get_articles_by_topic(&self, topic_id: i64) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store
            .articles
            .values()
            .filter(|a| a.topic_id == topic_id)
            .cloned()
            .collect())
    }

    async fn upsert_article(&self, article: NewArticle) -> Result<Article> {
        let mut store = self.store.write().await;
        Ok(store.upsert_article(article))
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<Article>> {
        let query = query.to_lowercase();
        let store = self.store.read().await;
        let mut found: Vec<Article> = store
            .articles
            .values()
            .filter(|a| {
                a.title.to_lowercase().contains(&query) || a.content.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(found)
    }

    async fn get_topic(&self, id: i64) -> Result<Option<Topic>> {
        let store = self.store.read().await;
        Ok(store.topics.get(&id).cloned())
    }

    async fn get_topics(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Topic>> {
        let store = self.store.read().await;
        let topics = store.topics_sorted(category);
        let limit = limit.unwrap_or(usize::MAX);
        Ok(topics.into_iter().skip(offset).take(limit).collect())
    }

    async fn upsert_topic(&self, topic: NewTopic) -> Result<Topic> {
        let mut store = self.store.write().await;
        Ok(store.upsert_topic(topic))
    }

    async fn get_topics_with_articles(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<TopicWithArticles>> {
        let store = self.store.read().await;
        let topics = store.topics_sorted(category);
        let limit = limit.unwrap_or(usize::MAX);
        Ok(topics
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|t| store.topic_with_articles(&t))
            .collect())
    }

    async fn get_topic_with_articles(&self, id: i64) -> Result<Option<TopicWithArticles>> {
        let store = self.store.read().await;
        Ok(store
            .topics
            .get(&id)
            .map(|t| store.topic_with_articles(t)))
    }

    async fn get_politician(&self, id: i64) -> Result<Option<Politician>> {
        let store = self.store.read().await;
        Ok(store.politicians.get(&id).cloned())
    }

    async fn get_politician_by_name(&self, name: &str) -> Result<Option<Politician>> {
        let name_lower = name.to_lowercase();
        let store = self.store.read().await;
        Ok(store
            .politicians
            .values()
            .find(|p| p.name.to_lowercase() == name_lower)
            .cloned())
    }

    async fn get_politicians(&self) -> Result<Vec<Politician>> {
        let store = self.store.read().await;
        let mut politicians: Vec<Politician> = store.politicians.values().cloned().collect();
        politicians.sort_by_key(|p| p.id);
        Ok(politicians)
    }

    async fn upsert_politician(&self, politician: NewPolitician) -> Result<Politician> {
        let mut store = self.store.write().await;
        Ok(store.upsert_politician(politician))
    }

    async fn get_top_rated_politicians(&self, limit: usize) -> Result<Vec<PoliticianWithRating>> {
        let store = self.store.read().await;
        let mut rated: Vec<PoliticianWithRating> = store
            .politicians
            .values()
            .map(|p| store.with_rating(p))
            .filter(|p| p.total_ratings > 0)
            .collect();
        rated.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rated.truncate(limit);
        Ok(rated)
    }

    async fn add_mention(&self, politician_id: i64, article_id: i64) -> Result<Mention> {
        let mut store = self.store.write().await;
        if !store.politicians.contains_key(&politician_id) {
            return Err(Error::NotFound(format!("politician {}", politician_id)));
        }
        Ok(store.add_mention(politician_id, article_id))
    }

    async fn get_mentions_for_article(&self, article_id: i64) -> Result<Vec<Mention>> {
        let store = self.store.read().await;
        Ok(store
            .mentions
            .values()
            .filter(|m| m.article_id == article_id)
            .cloned()
            .collect())
    }

    async fn get_politicians_in_article(&self, article_id: i64) -> Result<Vec<Politician>> {
        let store = self.store.read().await;
        Ok(store
            .mentions
            .values()
            .filter(|m| m.article_id == article_id)
            .filter_map(|m| store.politicians.get(&m.politician_id))
            .cloned()
            .collect())
    }

    async fn get_articles_with_politician(&self, politician_id: i64) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        let mut articles: Vec<Article> = store
            .mentions
            .values()
            .filter(|m| m.politician_id == politician_id)
            .filter_map(|m| store.articles.get(&m.article_id))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(articles)
    }

    async fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        if !(1..=5).contains(&rating.rating) {
            return Err(Error::validation(
                "rating",
                "rating must be between 1 and 5",
            ));
        }

        let mut store = self.store.write().await;
        if !store.politicians.contains_key(&rating.politician_id) {
            return Err(Error::NotFound(format!(
                "politician {}",
                rating.politician_id
            )));
        }

        let id = store.rating_id;
        store.rating_id += 1;
        let stored = Rating {
            id,
            politician_id: rating.politician_id,
            user_id: rating.user_id,
            rating: rating.rating,
            comment: rating.comment,
            created_at: chrono::Utc::now(),
        };
        store.ratings.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_ratings(&self, politician_id: i64) -> Result<Vec<Rating>> {
        let store = self.store.read().await;
        Ok(store
            .ratings
            .values()
            .filter(|r| r.politician_id == politician_id)
            .cloned()
            .collect())
    }

    async fn get_average_rating(&self, politician_id: i64) -> Result<f64> {
        let store = self.store.read().await;
        Ok(store.average_rating(politician_id))
    }

    async fn get_sources(&self) -> Result<Vec<Source>> {
        let store = self.store.read().await;
        Ok(store.sources.clone())
    }

    async fn get_categories(&self) -> Result<Vec<Category>> {
        let store = self.store.read().await;
        Ok(store.categories.clone())
    }
}
