//! Core module containing fundamental traits and types for the service

pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod service;
pub mod store;

pub use entity::Entity;
pub use error::{ApiError, Attempt, ConfigError, EntityError, ErrorResponse, ValidationError};
pub use field::FieldValue;
pub use query::{PaginatedResponse, PaginationMeta, QueryParams};
pub use service::DataService;
pub use store::{EntityQuery, ProjectedQuery};
