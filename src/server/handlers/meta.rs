//! Discovery endpoint listing the shapeable fields and sort aliases of a resource

use super::AppState;
use crate::core::entity::Entity;
use crate::core::error::{ApiError, EntityError};
use crate::entities::{Habit, HabitDto, Tag, TagDto};
use crate::shaping::schema::ShapeSchema;
use crate::sorting::options::SortOptions;
use axum::Json;
use axum::extract::{Path, State};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ResourceFields {
    pub resource: String,
    /// Every dot path accepted by `fields` and `excludeFields`
    pub fields: Vec<String>,
    pub sort: SortInfo,
}

#[derive(Debug, Serialize)]
pub struct SortInfo {
    pub default: Option<String>,
    pub aliases: IndexMap<String, String>,
}

impl From<&SortOptions> for SortInfo {
    fn from(options: &SortOptions) -> Self {
        Self {
            default: options.default_sort().map(str::to_string),
            aliases: options
                .aliases()
                .map(|(alias, path)| (alias.to_string(), path.to_string()))
                .collect(),
        }
    }
}

/// `GET /meta/{resource}/fields`
pub async fn resource_fields(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<ResourceFields>, ApiError> {
    let (fields, sort) = match resource.as_str() {
        r if r == Habit::resource_name() => (
            HabitDto::schema().paths(),
            state.registry.sort_options::<Habit>(),
        ),
        r if r == Tag::resource_name() => (
            TagDto::schema().paths(),
            state.registry.sort_options::<Tag>(),
        ),
        _ => {
            return Err(EntityError::UnknownResource {
                resource: resource.clone(),
            }
            .into());
        }
    };

    Ok(Json(ResourceFields {
        resource,
        fields,
        sort: SortInfo::from(sort.as_ref()),
    }))
}
