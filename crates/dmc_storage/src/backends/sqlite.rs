use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dmc_core::catalog;
use dmc_core::types::{
    Article, Category, Mention, NewArticle, NewPolitician, NewRating, NewTopic, Politician,
    PoliticianWithRating, Rating, Source, Topic, TopicWithArticles,
};
use dmc_core::{Error, NewsStorage, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use crate::StorageBackend;

const TOPIC_MATCH_PREFIX_CHARS: usize = 20;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS topics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        summary TEXT,
        category TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        summary TEXT,
        url TEXT NOT NULL UNIQUE,
        image_url TEXT,
        source TEXT NOT NULL,
        category TEXT NOT NULL,
        published_at TEXT NOT NULL,
        topic_id INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS politicians (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        party TEXT NOT NULL,
        position TEXT NOT NULL,
        image_url TEXT,
        mention_count INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mentions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        politician_id INTEGER NOT NULL,
        article_id INTEGER NOT NULL,
        UNIQUE(politician_id, article_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ratings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        politician_id INTEGER NOT NULL,
        user_id INTEGER,
        rating INTEGER NOT NULL,
        comment TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at ./news.db"
    }

    async fn new() -> Result<Self> {
        let db_path = PathBuf::from("news.db");
        Self::new_with_path(&db_path).await
    }
}

impl SqliteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| Error::Storage(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn politician_with_rating(&self, politician: Politician) -> Result<PoliticianWithRating> {
        let row = sqlx::query(
            "SELECT AVG(rating) AS average, COUNT(*) AS total FROM ratings WHERE politician_id = ?",
        )
        .bind(politician.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to read ratings: {}", e)))?;

        let average: Option<f64> = row.get("average");
        let total: i64 = row.get("total");
        Ok(PoliticianWithRating {
            politician,
            average_rating: average.unwrap_or(0.0),
            total_ratings: total as usize,
        })
    }

    async fn build_topic_with_articles(&self, topic: Topic) -> Result<TopicWithArticles> {
        let articles = self.get_articles_by_topic(topic.id).await?;

        let mut politician_ids = Vec::new();
        for article in &articles {
            for mention in self.get_mentions_for_article(article.id).await? {
                if !politician_ids.contains(&mention.politician_id) {
                    politician_ids.push(mention.politician_id);
                }
            }
        }

        let mut politicians = Vec::new();
        for id in politician_ids {
            if let Some(politician) = self.get_politician(id).await? {
                politicians.push(self.politician_with_rating(politician).await?);
            }
        }

        Ok(TopicWithArticles {
            id: topic.id,
            title: topic.title,
            summary: topic.summary,
            category: topic.category,
            updated_at: topic.updated_at,
            articles,
            politicians,
        })
    }
}

fn parse_datetime(raw: String) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date: {}", e)))
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        summary: row.get("summary"),
        url: row.get("url"),
        image_url: row.get("image_url"),
        source: row.get("source"),
        category: row.get("category"),
        published_at: parse_datetime(row.get("published_at"))?,
        topic_id: row.get("topic_id"),
    })
}

fn topic_from_row(row: &SqliteRow) -> Result<Topic> {
    Ok(Topic {
        id: row.get("id"),
        title: row.get("title"),
        summary: row.get("summary"),
        category: row.get("category"),
        updated_at: parse_datetime(row.get("updated_at"))?,
    })
}

fn politician_from_row(row: &SqliteRow) -> Politician {
    Politician {
        id: row.get("id"),
        name: row.get("name"),
        party: row.get("party"),
        position: row.get("position"),
        image_url: row.get("image_url"),
        mention_count: row.get("mention_count"),
    }
}

fn rating_from_row(row: &SqliteRow) -> Result<Rating> {
    Ok(Rating {
        id: row.get("id"),
        politician_id: row.get("politician_id"),
        user_id: row.get("user_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: parse_datetime(row.get("created_at"))?,
    })
}

#[async_trait]
impl NewsStorage for SqliteStorage {
    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get article: {}", e)))?;
        row.as_ref().map(article_from_row).transpose()
    }

    async fn get_articles_by_topic(&self, topic_id: i64) -> Result<Vec<Article>> {
        let rows =
            sqlx::query("SELECT * FROM articles WHERE topic_id = ? ORDER BY published_at DESC")
                .bind(topic_id)
                .fetch_all(&*self.pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to get articles: {}", e)))?;
        rows.iter().map(article_from_row).collect()
    }

    async fn upsert_article(&self, article: NewArticle) -> Result<Article> {
        sqlx::query(
            r#"
            INSERT INTO articles
            (title, content, summary, url, image_url, source, category, published_at, topic_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                summary = excluded.summary,
                image_url = excluded.image_url,
                source = excluded.source,
                category = excluded.category,
                published_at = excluded.published_at,
                topic_id = excluded.topic_id
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.summary)
        .bind(&article.url)
        .bind(&article.image_url)
        .bind(&article.source)
        .bind(&article.category)
        .bind(article.published_at.to_rfc3339())
        .bind(article.topic_id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to upsert article: {}", e)))?;

        let row = sqlx::query("SELECT * FROM articles WHERE url = ?")
            .bind(&article.url)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to read back article: {}", e)))?;
        article_from_row(&row)
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<Article>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            WHERE lower(title) LIKE ? OR lower(content) LIKE ?
            ORDER BY published_at DESC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to search articles: {}", e)))?;
        rows.iter().map(article_from_row).collect()
    }

    async fn get_topic(&self, id: i64) -> Result<Option<Topic>> {
        let row = sqlx::query("SELECT * FROM topics WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get topic: {}", e)))?;
        row.as_ref().map(topic_from_row).transpose()
    }

    async fn get_topics(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Topic>> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = match category {
            Some(category) => sqlx::query(
                r#"
                SELECT * FROM topics WHERE category = ?
                ORDER BY updated_at DESC LIMIT ? OFFSET ?
                "#,
            )
            .bind(category)
            .bind(limit)
            .bind(offset as i64)
            .fetch_all(&*self.pool)
            .await,
            None => sqlx::query(
                "SELECT * FROM topics ORDER BY updated_at DESC LIMIT ? OFFSET ?",
            )
            .bind(limit)
            .bind(offset as i64)
            .fetch_all(&*self.pool)
            .await,
        }
        .map_err(|e| Error::Storage(format!("Failed to get topics: {}", e)))?;
        rows.iter().map(topic_from_row).collect()
    }

    async fn upsert_topic(&self, topic: NewTopic) -> Result<Topic> {
        let prefix: String = topic.title.chars().take(TOPIC_MATCH_PREFIX_CHARS).collect();
        let existing = sqlx::query(
            "SELECT id FROM topics WHERE category = ? AND title LIKE '%' || ? || '%'",
        )
        .bind(&topic.category)
        .bind(&prefix)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to match topic: {}", e)))?;

        let id = if let Some(row) = existing {
            let id: i64 = row.get("id");
            sqlx::query("UPDATE topics SET title = ?, summary = ?, updated_at = ? WHERE id = ?")
                .bind(&topic.title)
                .bind(&topic.summary)
                .bind(topic.updated_at.to_rfc3339())
                .bind(id)
                .execute(&*self.pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to update topic: {}", e)))?;
            id
        } else {
            let result = sqlx::query(
                "INSERT INTO topics (title, summary, category, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&topic.title)
            .bind(&topic.summary)
            .bind(&topic.category)
            .bind(topic.updated_at.to_rfc3339())
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to insert topic: {}", e)))?;
            result.last_insert_rowid()
        };

        self.get_topic(id)
            .await?
            .ok_or_else(|| Error::Storage("Upserted topic disappeared".to_string()))
    }

    async fn get_topics_with_articles(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<TopicWithArticles>> {
        let topics = self.get_topics(category, limit, offset).await?;
        let mut full = Vec::with_capacity(topics.len());
        for topic in topics {
            full.push(self.build_topic_with_articles(topic).await?);
        }
        Ok(full)
    }

    async fn get_topic_with_articles(&self, id: i64) -> Result<Option<TopicWithArticles>> {
        match self.get_topic(id).await? {
            Some(topic) => Ok(Some(self.build_topic_with_articles(topic).await?)),
            None => Ok(None),
        }
    }

    async fn get_politician(&self, id: i64) -> Result<Option<Politician>> {
        let row = sqlx::query("SELECT * FROM politicians WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get politician: {}", e)))?;
        Ok(row.as_ref().map(politician_from_row))
    }

    async fn get_politician_by_name(&self, name: &str) -> Result<Option<Politician>> {
        let row = sqlx::query("SELECT * FROM politicians WHERE lower(name) = lower(?)")
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get politician: {}", e)))?;
        Ok(row.as_ref().map(politician_from_row))
    }

    async fn get_politicians(&self) -> Result<Vec<Politician>> {
        let rows = sqlx::query("SELECT * FROM politicians ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get politicians: {}", e)))?;
        Ok(rows.iter().map(politician_from_row).collect())
    }

    async fn upsert_politician(&self, politician: NewPolitician) -> Result<Politician> {
        match self.get_politician_by_name(&politician.name).await? {
            Some(existing) => {
                sqlx::query(
                    r#"
                    UPDATE politicians
                    SET party = ?, position = ?,
                        image_url = COALESCE(?, image_url)
                    WHERE id = ?
                    "#,
                )
                .bind(&politician.party)
                .bind(&politician.position)
                .bind(&politician.image_url)
                .bind(existing.id)
                .execute(&*self.pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to update politician: {}", e)))?;
                self.get_politician(existing.id)
                    .await?
                    .ok_or_else(|| Error::Storage("Upserted politician disappeared".to_string()))
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO politicians (name, party, position, image_url, mention_count)
                    VALUES (?, ?, ?, ?, 0)
                    "#,
                )
                .bind(&politician.name)
                .bind(&politician.party)
                .bind(&politician.position)
                .bind(&politician.image_url)
                .execute(&*self.pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to insert politician: {}", e)))?;
                self.get_politician(result.last_insert_rowid())
                    .await?
                    .ok_or_else(|| Error::Storage("Inserted politician disappeared".to_string()))
            }
        }
    }

    async fn get_top_rated_politicians(&self, limit: usize) -> Result<Vec<PoliticianWithRating>> {
        let rows = sqlx::query(
            r#"
            SELECT p.*, AVG(r.rating) AS average, COUNT(r.id) AS total
            FROM politicians p
            JOIN ratings r ON r.politician_id = p.id
            GROUP BY p.id
            ORDER BY average DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to get top politicians: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                let average: Option<f64> = row.get("average");
                let total: i64 = row.get("total");
                PoliticianWithRating {
                    politician: politician_from_row(row),
                    average_rating: average.unwrap_or(0.0),
                    total_ratings: total as usize,
                }
            })
            .collect())
    }

    async fn add_mention(&self, politician_id: i64, article_id: i64) -> Result<Mention> {
        if self.get_politician(politician_id).await?.is_none() {
            return Err(Error::NotFound(format!("politician {}", politician_id)));
        }

        let result = sqlx::query(
            "INSERT OR IGNORE INTO mentions (politician_id, article_id) VALUES (?, ?)",
        )
        .bind(politician_id)
        .bind(article_id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to add mention: {}", e)))?;

        // Only a fresh pair bumps the mention counter.
        if result.rows_affected() > 0 {
            sqlx::query("UPDATE politicians SET mention_count = mention_count + 1 WHERE id = ?")
                .bind(politician_id)
                .execute(&*self.pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to bump mention count: {}", e)))?;
        }

        let row = sqlx::query(
            "SELECT * FROM mentions WHERE politician_id = ? AND article_id = ?",
        )
        .bind(politician_id)
        .bind(article_id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to read back mention: {}", e)))?;

        Ok(Mention {
            id: row.get("id"),
            politician_id: row.get("politician_id"),
            article_id: row.get("article_id"),
        })
    }

    async fn get_mentions_for_article(&self, article_id: i64) -> Result<Vec<Mention>> {
        let rows = sqlx::query("SELECT * FROM mentions WHERE article_id = ?")
            .bind(article_id)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get mentions: {}", e)))?;
        Ok(rows
            .iter()
            .map(|row| Mention {
                id: row.get("id"),
                politician_id: row.get("politician_id"),
                article_id: row.get("article_id"),
            })
            .collect())
    }

    async fn get_politicians_in_article(&self, article_id: i64) -> Result<Vec<Politician>> {
        let rows = sqlx::query(
            r#"
            SELECT p.* FROM politicians p
            JOIN mentions m ON m.politician_id = p.id
            WHERE m.article_id = ?
            "#,
        )
        .bind(article_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to get politicians in article: {}", e)))?;
        Ok(rows.iter().map(politician_from_row).collect())
    }

    async fn get_articles_with_politician(&self, politician_id: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT a.* FROM articles a
            JOIN mentions m ON m.article_id = a.id
            WHERE m.politician_id = ?
            ORDER BY a.published_at DESC
            "#,
        )
        .bind(politician_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to get articles with politician: {}", e)))?;
        rows.iter().map(article_from_row).collect()
    }

    async fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        if !(1..=5).contains(&rating.rating) {
            return Err(Error::validation(
                "rating",
                "rating must be between 1 and 5",
            ));
        }
        if self.get_politician(rating.politician_id).await?.is_none() {
            return Err(Error::NotFound(format!(
                "politician {}",
                rating.politician_id
            )));
        }

        let created_at = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO ratings (politician_id, user_id, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(rating.politician_id)
        .bind(rating.user_id)
        .bind(rating.rating)
        .bind(&rating.comment)
        .bind(created_at.to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to create rating: {}", e)))?;

        Ok(Rating {
            id: result.last_insert_rowid(),
            politician_id: rating.politician_id,
            user_id: rating.user_id,
            rating: rating.rating,
            comment: rating.comment,
            created_at,
        })
    }

    async fn get_ratings(&self, politician_id: i64) -> Result<Vec<Rating>> {
        let rows = sqlx::query("SELECT * FROM ratings WHERE politician_id = ?")
            .bind(politician_id)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to get ratings: {}", e)))?;
        rows.iter().map(rating_from_row).collect()
    }

    async fn get_average_rating(&self, politician_id: i64) -> Result<f64> {
        let row = sqlx::query("SELECT AVG(rating) AS average FROM ratings WHERE politician_id = ?")
            .bind(politician_id)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to compute average: {}", e)))?;
        let average: Option<f64> = row.get("average");
        Ok(average.unwrap_or(0.0))
    }

    async fn get_sources(&self) -> Result<Vec<Source>> {
        Ok(catalog::default_sources())
    }

    async fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(catalog::default_categories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    async fn test_storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(&dir.path().join("test.db"))
            .await
            .unwrap();
        (dir, storage)
    }

    fn new_article(url: &str) -> NewArticle {
        NewArticle {
            title: "הכנסת אישרה את התקציב".to_string(),
            content: "מליאת הכנסת אישרה ברוב קולות את התקציב".to_string(),
            summary: None,
            url: url.to_string(),
            image_url: None,
            source: "N12".to_string(),
            category: "politics".to_string(),
            published_at: Utc::now(),
            topic_id: 1,
        }
    }

    #[tokio::test]
    async fn test_article_upsert_by_url() {
        let (_dir, storage) = test_storage().await;
        let first = storage
            .upsert_article(new_article("http://n12.co.il/a"))
            .await
            .unwrap();

        let mut update = new_article("http://n12.co.il/a");
        update.summary = Some("תקציר".to_string());
        let second = storage.upsert_article(update).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.summary.as_deref(), Some("תקציר"));
    }

    #[tokio::test]
    async fn test_mention_idempotency_and_count() {
        let (_dir, storage) = test_storage().await;
        let politician = storage
            .upsert_politician(NewPolitician {
                name: "בנימין נתניהו".to_string(),
                party: "הליכוד".to_string(),
                position: "ראש הממשלה".to_string(),
                image_url: None,
            })
            .await
            .unwrap();
        let article = storage
            .upsert_article(new_article("http://n12.co.il/b"))
            .await
            .unwrap();

        storage.add_mention(politician.id, article.id).await.unwrap();
        storage.add_mention(politician.id, article.id).await.unwrap();

        let mentions = storage.get_mentions_for_article(article.id).await.unwrap();
        assert_eq!(mentions.len(), 1);
        let politician = storage.get_politician(politician.id).await.unwrap().unwrap();
        assert_eq!(politician.mention_count, 1);
    }

    #[tokio::test]
    async fn test_rating_validation_and_average() {
        let (_dir, storage) = test_storage().await;
        let politician = storage
            .upsert_politician(NewPolitician {
                name: "יאיר לפיד".to_string(),
                party: "יש עתיד".to_string(),
                position: "ראש האופוזיציה".to_string(),
                image_url: None,
            })
            .await
            .unwrap();

        assert!(storage
            .create_rating(NewRating {
                politician_id: politician.id,
                user_id: None,
                rating: 9,
                comment: None,
            })
            .await
            .is_err());

        for value in [2, 4] {
            storage
                .create_rating(NewRating {
                    politician_id: politician.id,
                    user_id: None,
                    rating: value,
                    comment: None,
                })
                .await
                .unwrap();
        }
        let average = storage.get_average_rating(politician.id).await.unwrap();
        assert!((average - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_topic_upsert_and_aggregation() {
        let (_dir, storage) = test_storage().await;
        let topic = storage
            .upsert_topic(NewTopic {
                title: "הממשלה אישרה את התקציב החדש לשנת 2025".to_string(),
                summary: None,
                category: "politics".to_string(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        let merged = storage
            .upsert_topic(NewTopic {
                title: "הממשלה אישרה את התקציב החדש לשנת 2025 ברוב קולות".to_string(),
                summary: Some("עדכון".to_string()),
                category: "politics".to_string(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(topic.id, merged.id);

        let mut article = new_article("http://n12.co.il/c");
        article.topic_id = topic.id;
        storage.upsert_article(article).await.unwrap();

        let full = storage
            .get_topic_with_articles(topic.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full.articles.len(), 1);
    }
}
