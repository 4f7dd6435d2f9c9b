use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dmc_core::{Error, NewRating, PoliticianWithRating};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::AppState;

/// Error envelope: every failure renders as `{ "message": ... }` with the
/// appropriate status. Unexpected errors are logged and masked.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validation { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            other => {
                tracing::error!("request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

pub async fn get_categories(State(state): State<Arc<AppState>>) -> ApiResult {
    let categories = state.storage.get_categories().await?;
    Ok(Json(json!({ "categories": categories })))
}

pub async fn get_sources(State(state): State<Arc<AppState>>) -> ApiResult {
    let sources = state.storage.get_sources().await?;
    Ok(Json(json!({ "sources": sources })))
}

#[derive(Deserialize)]
pub struct TopicsQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn get_topics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopicsQuery>,
) -> ApiResult {
    let topics = state
        .storage
        .get_topics_with_articles(
            query.category.as_deref(),
            query.limit,
            query.offset.unwrap_or(0),
        )
        .await?;
    Ok(Json(json!({ "topics": topics })))
}

pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult {
    let topic = state
        .storage
        .get_topic_with_articles(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("topic {}", id)))?;
    Ok(Json(json!({ "topic": topic })))
}

async fn with_rating(
    state: &AppState,
    politician: dmc_core::Politician,
) -> Result<PoliticianWithRating, Error> {
    let ratings = state.storage.get_ratings(politician.id).await?;
    let average = state.storage.get_average_rating(politician.id).await?;
    Ok(PoliticianWithRating {
        politician,
        average_rating: average,
        total_ratings: ratings.len(),
    })
}

pub async fn get_politicians(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut politicians = Vec::new();
    for politician in state.storage.get_politicians().await? {
        politicians.push(with_rating(&state, politician).await?);
    }
    Ok(Json(json!({ "politicians": politicians })))
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

pub async fn get_top_politicians(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> ApiResult {
    let politicians = state
        .storage
        .get_top_rated_politicians(query.limit.unwrap_or(10))
        .await?;
    Ok(Json(json!({ "politicians": politicians })))
}

pub async fn get_politician(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult {
    let politician = state
        .storage
        .get_politician(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("politician {}", id)))?;
    let articles = state.storage.get_articles_with_politician(id).await?;
    let politician = with_rating(&state, politician).await?;
    Ok(Json(json!({ "politician": politician, "articles": articles })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePayload {
    pub rating: i32,
    pub comment: Option<String>,
    pub user_id: Option<i64>,
}

pub async fn rate_politician(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<RatePayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let rating = state
        .storage
        .create_rating(NewRating {
            politician_id: id,
            user_id: payload.user_id,
            rating: payload.rating,
            comment: payload.comment,
        })
        .await?;
    let average = state.storage.get_average_rating(id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "rating": rating, "averageRating": average })),
    ))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::validation("q", "query parameter is required"))?;
    let articles = state.storage.search_articles(q).await?;
    Ok(Json(json!({ "articles": articles })))
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult {
    let summary = state.manager.refresh_all().await;
    Ok(Json(json!({
        "message": "refresh complete",
        "topics": summary.topics,
        "articles": summary.articles,
    })))
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

pub async fn fetch_ynet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("politics");
    let summary = state.manager.refresh_category(category).await?;
    Ok(Json(json!({
        "category": category,
        "topics": summary.topics,
        "articles": summary.articles,
    })))
}

pub async fn fetch_political_news(State(state): State<Arc<AppState>>) -> ApiResult {
    let articles = state.manager.fetch_political_news().await?;
    Ok(Json(json!({ "articles": articles })))
}

pub async fn fetch_politician(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult {
    let articles = state.manager.fetch_for_politician(&name).await?;
    let politician = state.storage.get_politician_by_name(&name).await?;
    Ok(Json(json!({ "politician": politician, "articles": articles })))
}

pub async fn rss_news(State(state): State<Arc<AppState>>) -> ApiResult {
    let items = state.manager.rss().fetch_primary().await?;
    Ok(Json(json!({ "items": items })))
}

/// Mobile shell variant: every configured feed is fetched and reported
/// individually, so a dead source never blanks the whole screen.
pub async fn webview_news(State(state): State<Arc<AppState>>) -> ApiResult {
    let results = state.manager.rss().fetch_all_settled().await;
    Ok(Json(json!({ "sources": results })))
}
