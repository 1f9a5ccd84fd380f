use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::query::{QueryError, QueryGateway, QueryParams};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub struct AppState {
    pub gateway: QueryGateway,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if let QueryError::Encoding(ref err) = self {
            error!(error = %err, "Failed to encode query response");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        match serde_json::to_vec(&body) {
            Ok(bytes) => json_response(status, bytes),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}

/// Look up one or more comma-separated IP addresses
pub async fn query_ip(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, QueryError> {
    let params = QueryParams::from_query_string(query.as_deref().unwrap_or(""));
    let payload = state.gateway.query(&params)?;
    let body = payload.to_json()?;
    Ok(json_response(StatusCode::OK, body))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
