use crate::types::{
    Article, Category, Mention, NewArticle, NewPolitician, NewRating, NewTopic, Politician,
    PoliticianWithRating, Rating, Source, Topic, TopicWithArticles,
};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait NewsStorage: Send + Sync {
    // Articles
    async fn get_article(&self, id: i64) -> Result<Option<Article>>;
    async fn get_articles_by_topic(&self, topic_id: i64) -> Result<Vec<Article>>;
    /// Upsert by URL: an article whose URL matches an existing record updates
    /// that record instead of creating a duplicate.
    async fn upsert_article(&self, article: NewArticle) -> Result<Article>;
    /// Case-insensitive substring search over title and content.
    async fn search_articles(&self, query: &str) -> Result<Vec<Article>>;

    // Topics
    async fn get_topic(&self, id: i64) -> Result<Option<Topic>>;
    async fn get_topics(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Topic>>;
    /// Upsert by (category, title-substring) match: a topic in the same
    /// category whose title contains the first 20 chars of the new title is
    /// updated instead of creating a new one.
    async fn upsert_topic(&self, topic: NewTopic) -> Result<Topic>;
    async fn get_topics_with_articles(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<TopicWithArticles>>;
    async fn get_topic_with_articles(&self, id: i64) -> Result<Option<TopicWithArticles>>;

    // Politicians
    async fn get_politician(&self, id: i64) -> Result<Option<Politician>>;
    async fn get_politician_by_name(&self, name: &str) -> Result<Option<Politician>>;
    async fn get_politicians(&self) -> Result<Vec<Politician>>;
    /// Upsert by name (case-insensitive).
    async fn upsert_politician(&self, politician: NewPolitician) -> Result<Politician>;
    /// Politicians that have at least one rating, ordered by average rating
    /// descending.
    async fn get_top_rated_politicians(&self, limit: usize) -> Result<Vec<PoliticianWithRating>>;

    // Mentions
    /// Idempotent: inserting an existing (politician, article) pair is a no-op
    /// and returns the stored mention. The politician's mention count is only
    /// incremented on first insert.
    async fn add_mention(&self, politician_id: i64, article_id: i64) -> Result<Mention>;
    async fn get_mentions_for_article(&self, article_id: i64) -> Result<Vec<Mention>>;
    async fn get_politicians_in_article(&self, article_id: i64) -> Result<Vec<Politician>>;
    async fn get_articles_with_politician(&self, politician_id: i64) -> Result<Vec<Article>>;

    // Ratings
    /// Rejects ratings outside [1, 5] with a validation error; nothing is
    /// stored in that case.
    async fn create_rating(&self, rating: NewRating) -> Result<Rating>;
    async fn get_ratings(&self, politician_id: i64) -> Result<Vec<Rating>>;
    /// Arithmetic mean of all ratings for the politician, 0.0 when unrated.
    /// Computed on read, never stored.
    async fn get_average_rating(&self, politician_id: i64) -> Result<f64>;

    // Catalogs
    async fn get_sources(&self) -> Result<Vec<Source>>;
    async fn get_categories(&self) -> Result<Vec<Category>>;
}
