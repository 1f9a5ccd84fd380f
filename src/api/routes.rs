use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::query::QueryGateway;

use super::handlers::{health_check, query_ip, AppState};

pub fn create_api_router(gateway: QueryGateway) -> Router {
    let state = Arc::new(AppState { gateway });

    Router::new()
        .route("/health", get(health_check))
        .route("/query", get(query_ip))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
