use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/sources", get(handlers::get_sources))
        .route("/api/topics", get(handlers::get_topics))
        .route("/api/topics/:id", get(handlers::get_topic))
        .route("/api/politicians", get(handlers::get_politicians))
        .route("/api/politicians/top", get(handlers::get_top_politicians))
        .route("/api/politicians/:id", get(handlers::get_politician))
        .route("/api/politicians/:id/rate", post(handlers::rate_politician))
        .route("/api/search", get(handlers::search))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/fetch-ynet", get(handlers::fetch_ynet))
        .route(
            "/api/fetch-political-news",
            get(handlers::fetch_political_news),
        )
        .route(
            "/api/fetch-politician/:name",
            get(handlers::fetch_politician),
        )
        .route("/api/news", get(handlers::rss_news))
        .route("/api/webview/news", get(handlers::webview_news))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use dmc_core::{Error, Result};
}
