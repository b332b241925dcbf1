//! # Habit Tracker
//!
//! A REST API for habits and tags whose list and detail endpoints let
//! clients pick the shape of every response.
//!
//! ## Features
//!
//! - **Field Shaping**: `fields=name,target.value` keeps only the named fields,
//!   `excludeFields=tags` drops fields, and both can be combined
//! - **Query Projection**: list endpoints project straight from the stored
//!   entities through a configured mapping instead of building full DTOs
//! - **Alias Sorting**: `sort=name desc,createdAt` orders by client-facing
//!   aliases resolved to internal field paths
//! - **Configuration-Based**: server, pagination, logging and sort overrides
//!   are read from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use habits::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::from_yaml_file("habits.yaml")?)
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod registry;
pub mod server;
pub mod shaping;
pub mod sorting;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, Attempt, DataService, Entity, EntityQuery, FieldValue, PaginatedResponse,
        QueryParams,
    };

    // === Shaping ===
    pub use crate::shaping::{
        MappingConfiguration, Schema, ShapeSchema, ShapingError, exclude_fields, include_fields,
        shape_fields, shape_fields_query, shape_object,
    };

    // === Sorting ===
    pub use crate::sorting::{SortOptions, apply_sort, try_apply_sort};

    // === Registry ===
    pub use crate::registry::{
        MappingConfigurator, RegistryBuilder, ShapingRegistry, SortConfigurator,
    };

    // === Entities ===
    pub use crate::entities::{Habit, HabitDto, Tag, TagDto, register_all};

    // === Storage ===
    pub use crate::storage::InMemoryDataService;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
