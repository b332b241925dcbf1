//! Route table and HTTP layers

use super::handlers::{AppState, habits, meta, tags};
use crate::config::ServerConfig;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router
///
/// Routes:
/// - GET /health
/// - GET, POST /habits
/// - GET, PUT, DELETE /habits/{id}
/// - PUT /habits/{id}/tags
/// - GET, POST /tags
/// - GET, PUT, DELETE /tags/{id}
/// - GET /meta/{resource}/fields
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route(
            "/habits",
            get(habits::list_habits).post(habits::create_habit),
        )
        .route(
            "/habits/{id}",
            get(habits::get_habit)
                .put(habits::update_habit)
                .delete(habits::delete_habit),
        )
        .route("/habits/{id}/tags", put(habits::replace_habit_tags))
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/tags/{id}",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route("/meta/{resource}/fields", get(meta::resource_fields))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match build_cors_layer(&config.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS layer for the configured origins; `None` when no origin is configured
fn build_cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }
    Some(layer.allow_origin(origins))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "habit-tracker"
    }))
}
