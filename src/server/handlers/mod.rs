//! HTTP handlers and their shared state

pub mod habits;
pub mod meta;
pub mod tags;

use crate::config::PaginationConfig;
use crate::core::error::{ApiError, ValidationError};
use crate::core::query::QueryParams;
use crate::core::service::DataService;
use crate::entities::{Habit, Tag};
use crate::registry::ShapingRegistry;
use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use std::sync::Arc;
use uuid::Uuid;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub habits: Arc<dyn DataService<Habit>>,
    pub tags: Arc<dyn DataService<Tag>>,
    pub registry: Arc<ShapingRegistry>,
    pub pagination: PaginationConfig,
}

/// Parse an id path segment
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::Validation(ValidationError::InvalidPayload {
            message: format!("'{}' is not a valid id", raw),
        })
    })
}

/// Unwrap query parameters, reporting malformed ones as a validation error
pub(crate) fn query_params(
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<QueryParams, ApiError> {
    params.map(|Query(params)| params).map_err(|rejection| {
        ApiError::Validation(ValidationError::InvalidPayload {
            message: rejection.body_text(),
        })
    })
}

/// Unwrap a JSON body, reporting malformed ones as a validation error
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(body)| body).map_err(|rejection| {
        ApiError::Validation(ValidationError::InvalidPayload {
            message: rejection.body_text(),
        })
    })
}
