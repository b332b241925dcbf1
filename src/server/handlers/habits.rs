//! Habit HTTP handlers

use super::{AppState, json_body, parse_id, query_params};
use crate::core::entity::Entity;
use crate::core::error::{ApiError, EntityError};
use crate::core::query::{PaginatedResponse, PaginationMeta, QueryParams};
use crate::entities::habit::{
    CreateHabitRequest, Habit, HabitDto, HabitTag, ReplaceTagsRequest, UpdateHabitRequest,
};
use crate::shaping::facade::{shape_fields_query, shape_object};
use crate::sorting::apply::apply_sort;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// `GET /habits`
///
/// Filtering, sorting and pagination run on the query; the requested
/// fields are projected straight from the stored habits.
pub async fn list_habits(
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<Value>>, ApiError> {
    let params = query_params(params)?;
    let mapping = state.registry.require_mapping::<Habit, HabitDto>()?;
    let sort_options = state.registry.sort_options::<Habit>();

    let page = params.page();
    let limit = params.limit(state.pagination.default_limit, state.pagination.max_limit);

    let mut query = state.habits.query().await?;
    if let Some(term) = params.search() {
        let term = term.to_string();
        query = query.filter(move |habit: &Habit| habit.matches_search(&term));
    }

    let query = apply_sort(query, params.sort.as_deref(), &sort_options)?.paginate(page, limit);
    let projected = shape_fields_query(
        query,
        params.fields.as_deref(),
        params.exclude_fields.as_deref(),
        &mapping,
    )?;

    let total = projected.count();
    let data = projected.fetch();

    Ok(Json(PaginatedResponse {
        data,
        pagination: PaginationMeta::new(page, limit, total),
    }))
}

/// `GET /habits/{id}`
pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let params = query_params(params)?;
    let habit = find_habit(&state, &id).await?;

    let shaped = shape_object(
        &HabitDto::from(&habit),
        params.fields.as_deref(),
        params.exclude_fields.as_deref(),
    )?;
    Ok(Json(shaped))
}

/// `POST /habits`
pub async fn create_habit(
    State(state): State<AppState>,
    body: Result<Json<CreateHabitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<HabitDto>), ApiError> {
    let payload = json_body(body)?;
    payload.validate()?;

    let tags = resolve_tags(&state, &payload.tag_ids).await?;
    let habit = state.habits.create(payload.into_habit(tags)).await?;

    tracing::info!(id = %habit.id, name = %habit.name, "habit created");
    Ok((StatusCode::CREATED, Json(HabitDto::from(&habit))))
}

/// `PUT /habits/{id}`
pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateHabitRequest>, JsonRejection>,
) -> Result<Json<HabitDto>, ApiError> {
    let id = parse_id(&id)?;
    let payload = json_body(body)?;
    payload.validate()?;

    let mut habit = find_habit(&state, &id).await?;
    payload.apply(&mut habit)?;
    let habit = state.habits.update(&id, habit).await?;

    Ok(Json(HabitDto::from(&habit)))
}

/// `PUT /habits/{id}/tags`
pub async fn replace_habit_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ReplaceTagsRequest>, JsonRejection>,
) -> Result<Json<HabitDto>, ApiError> {
    let id = parse_id(&id)?;
    let payload = json_body(body)?;
    payload.validate()?;

    let mut habit = find_habit(&state, &id).await?;
    habit.tags = resolve_tags(&state, &payload.tag_ids).await?;
    habit.touch();
    let habit = state.habits.update(&id, habit).await?;

    Ok(Json(HabitDto::from(&habit)))
}

/// `DELETE /habits/{id}`
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    if !state.habits.delete(&id).await? {
        return Err(not_found(id));
    }

    tracing::info!(%id, "habit deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_habit(state: &AppState, id: &Uuid) -> Result<Habit, ApiError> {
    state
        .habits
        .get(id)
        .await?
        .ok_or_else(|| not_found(*id))
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::Entity(EntityError::NotFound {
        entity_type: Habit::resource_name_singular().to_string(),
        id,
    })
}

/// Look up tags by id, in request order, ignoring repeated ids
async fn resolve_tags(state: &AppState, ids: &[Uuid]) -> Result<Vec<HabitTag>, ApiError> {
    let mut tags: Vec<HabitTag> = Vec::with_capacity(ids.len());

    for id in ids {
        if tags.iter().any(|tag| &tag.id == id) {
            continue;
        }
        let tag = state.tags.get(id).await?.ok_or(EntityError::InvalidReference {
            entity_type: "tag".to_string(),
            id: *id,
        })?;
        tags.push(HabitTag::from(&tag));
    }

    Ok(tags)
}
