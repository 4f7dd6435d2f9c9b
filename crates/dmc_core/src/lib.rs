pub mod catalog;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::InferenceModel;
pub use storage::NewsStorage;
pub use types::{
    Article, Category, FetchedArticle, Mention, NewArticle, NewPolitician, NewRating, NewTopic,
    Politician, PoliticianWithRating, Rating, Source, Topic, TopicWithArticles,
};

pub type Result<T> = std::result::Result<T, Error>;
