//! Typed error handling for the habit tracker
//!
//! Engine-level errors live next to their engines ([`ShapingError`],
//! [`SortError`]). This module gathers them into [`ApiError`], the type
//! handlers return, which knows its HTTP status and response body.
//!
//! # Error Categories
//!
//! - [`EntityError`]: Errors related to entity operations (CRUD)
//! - [`ShapingError`]: Invalid or conflicting field selections, plus
//!   internal shaping failures
//! - [`SortError`]: Unknown sort aliases or directions
//! - [`ValidationError`]: Rejected request payloads
//! - [`ConfigError`]: Startup configuration problems
//!
//! # Example
//!
//! ```rust,ignore
//! async fn get_habit(id: Uuid) -> Result<Habit, ApiError> {
//!     service.get(&id).await?.ok_or_else(|| {
//!         ApiError::Entity(EntityError::NotFound {
//!             entity_type: "habit".to_string(),
//!             id,
//!         })
//!     })
//! }
//! ```

use crate::shaping::error::{FieldError, ShapeConflictError, ShapingError};
use crate::sorting::validator::SortError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Entity-related errors (CRUD operations)
    Entity(EntityError),

    /// Field shaping errors
    Shaping(ShapingError),

    /// Sort string errors
    Sort(SortError),

    /// Request payload errors
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (storage failures and other bugs)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Shaping(e) => write!(f, "{}", e),
            ApiError::Sort(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Config(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Entity(e) => Some(e),
            ApiError::Shaping(e) => Some(e),
            ApiError::Sort(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Config(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Entity(e) => e.status_code(),
            ApiError::Shaping(e) if e.is_user_error() => StatusCode::BAD_REQUEST,
            ApiError::Shaping(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Sort(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Entity(e) => e.error_code(),
            ApiError::Shaping(ShapingError::Field(_)) => "INVALID_FIELDS",
            ApiError::Shaping(ShapingError::Conflict(_)) => "FIELD_CONFLICT",
            ApiError::Shaping(ShapingError::Contract(_)) => "SHAPING_CONTRACT_VIOLATION",
            ApiError::Shaping(ShapingError::Serialization { .. }) => "SERIALIZATION_ERROR",
            ApiError::Sort(_) => "INVALID_SORT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ApiError::Shaping(ShapingError::Field(e)) => {
                Some(serde_json::json!({ "field": e.token() }))
            }
            ApiError::Shaping(ShapingError::Conflict(ShapeConflictError::Overlap { tokens })) => {
                Some(serde_json::json!({ "fields": tokens }))
            }
            ApiError::Sort(SortError::InvalidField { field })
            | ApiError::Sort(SortError::InvalidDirection { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::warn!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<ShapingError> for ApiError {
    fn from(err: ShapingError) -> Self {
        ApiError::Shaping(err)
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Shaping(err.into())
    }
}

impl From<SortError> for ApiError {
    fn from(err: SortError) -> Self {
        ApiError::Sort(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug)]
pub enum EntityError {
    /// Entity was not found
    NotFound { entity_type: String, id: Uuid },

    /// An entity with the same unique name already exists
    AlreadyExists { entity_type: String, name: String },

    /// A referenced entity does not exist
    InvalidReference { entity_type: String, id: Uuid },

    /// No resource with this name is served
    UnknownResource { resource: String },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::AlreadyExists { entity_type, name } => {
                write!(f, "{} named '{}' already exists", entity_type, name)
            }
            EntityError::InvalidReference { entity_type, id } => {
                write!(f, "referenced {} '{}' does not exist", entity_type, id)
            }
            EntityError::UnknownResource { resource } => {
                write!(f, "unknown resource '{}'", resource)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            EntityError::UnknownResource { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::InvalidReference { .. } => "INVALID_REFERENCE",
            EntityError::UnknownResource { .. } => "UNKNOWN_RESOURCE",
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request payloads
#[derive(Debug)]
pub enum ValidationError {
    /// Field-level failures reported by the `validator` crate
    FieldErrors(serde_json::Value),

    /// The payload could not be read at all
    InvalidPayload { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(_) => write!(f, "Request payload failed validation"),
            ValidationError::InvalidPayload { message } => {
                write!(f, "Invalid request payload: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = serde_json::to_value(&errors).unwrap_or_default();
        ApiError::Validation(ValidationError::FieldErrors(fields))
    }
}

impl From<validator::ValidationError> for ApiError {
    fn from(error: validator::ValidationError) -> Self {
        ApiError::Validation(ValidationError::InvalidPayload {
            message: error.to_string(),
        })
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading configuration or building registries
#[derive(Debug)]
pub enum ConfigError {
    /// A mapping configuration reported problems while being built
    InvalidMapping {
        entity: &'static str,
        dto: &'static str,
        problems: Vec<String>,
    },

    /// The same entity/DTO pair was registered twice
    DuplicateMapping {
        entity: &'static str,
        dto: &'static str,
    },

    /// A required mapping was never registered
    MissingMapping {
        entity: &'static str,
        dto: &'static str,
    },

    /// A default sort does not resolve against the resource's aliases
    InvalidDefaultSort {
        resource: &'static str,
        default: String,
        reason: String,
    },

    /// A configuration source could not be read or parsed
    Load { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMapping {
                entity,
                dto,
                problems,
            } => write!(
                f,
                "Invalid mapping {} -> {}: {}",
                entity,
                dto,
                problems.join("; ")
            ),
            ConfigError::DuplicateMapping { entity, dto } => {
                write!(f, "Mapping {} -> {} is registered twice", entity, dto)
            }
            ConfigError::MissingMapping { entity, dto } => {
                write!(f, "No mapping registered for {} -> {}", entity, dto)
            }
            ConfigError::InvalidDefaultSort {
                resource,
                default,
                reason,
            } => write!(
                f,
                "Invalid default sort '{}' for {}: {}",
                default, resource, reason
            ),
            ConfigError::Load { message } => write!(f, "Failed to load configuration: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

// =============================================================================
// Attempt
// =============================================================================

/// Outcome of a non-failing operation
///
/// `try_*` functions report bad user input as `Rejected` with a readable
/// message instead of an error value, so callers can branch on it directly.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Attempt<T> {
    Done(T),
    Rejected(String),
}

impl<T> Attempt<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Done(_))
    }

    /// The rejection message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Attempt::Done(_) => None,
            Attempt::Rejected(message) => Some(message),
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Attempt::Done(value) => Some(value),
            Attempt::Rejected(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Attempt::Done(value) => Ok(value),
            Attempt::Rejected(message) => Err(message),
        }
    }
}
