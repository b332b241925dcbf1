//! Tag HTTP handlers
//!
//! Tags are shaped in memory: the page is fetched first, converted to
//! [`TagDto`]s and then trimmed to the requested fields.

use super::{AppState, json_body, parse_id, query_params};
use crate::core::entity::Entity;
use crate::core::error::{ApiError, EntityError};
use crate::core::query::{PaginatedResponse, PaginationMeta, QueryParams};
use crate::entities::tag::{CreateTagRequest, Tag, TagDto, UpdateTagRequest};
use crate::shaping::facade::{shape_fields, shape_object};
use crate::sorting::apply::apply_sort;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// `GET /tags`
pub async fn list_tags(
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<Value>>, ApiError> {
    let params = query_params(params)?;
    let sort_options = state.registry.sort_options::<Tag>();

    let page = params.page();
    let limit = params.limit(state.pagination.default_limit, state.pagination.max_limit);

    let mut query = state.tags.query().await?;
    if let Some(term) = params.search() {
        let term = term.to_string();
        query = query.filter(move |tag: &Tag| tag.matches_search(&term));
    }

    let query = apply_sort(query, params.sort.as_deref(), &sort_options)?.paginate(page, limit);
    let total = query.count();
    let dtos: Vec<TagDto> = query.fetch().iter().map(TagDto::from).collect();

    let data = shape_fields(
        &dtos,
        params.fields.as_deref(),
        params.exclude_fields.as_deref(),
    )?;

    Ok(Json(PaginatedResponse {
        data,
        pagination: PaginationMeta::new(page, limit, total),
    }))
}

/// `GET /tags/{id}`
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let params = query_params(params)?;
    let tag = find_tag(&state, &id).await?;

    let shaped = shape_object(
        &TagDto::from(&tag),
        params.fields.as_deref(),
        params.exclude_fields.as_deref(),
    )?;
    Ok(Json(shaped))
}

/// `POST /tags`
pub async fn create_tag(
    State(state): State<AppState>,
    body: Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TagDto>), ApiError> {
    let payload = json_body(body)?;
    payload.validate()?;

    let tag = payload.into_tag();
    ensure_unique_name(&state, &tag.name, None).await?;
    let tag = state.tags.create(tag).await?;

    tracing::info!(id = %tag.id, name = %tag.name, "tag created");
    Ok((StatusCode::CREATED, Json(TagDto::from(&tag))))
}

/// `PUT /tags/{id}`
///
/// A rename is copied onto every habit carrying the tag. Each habit is read,
/// changed and written back, so a habit update landing in between is
/// overwritten by the older copy (last write wins).
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTagRequest>, JsonRejection>,
) -> Result<Json<TagDto>, ApiError> {
    let id = parse_id(&id)?;
    let payload = json_body(body)?;
    payload.validate()?;

    let mut tag = find_tag(&state, &id).await?;
    let previous_name = tag.name.clone();
    payload.apply(&mut tag);

    if tag.name != previous_name {
        ensure_unique_name(&state, &tag.name, Some(id)).await?;
    }
    let tag = state.tags.update(&id, tag).await?;

    if tag.name != previous_name {
        for mut habit in state.habits.list().await? {
            let mut renamed = false;
            for habit_tag in habit.tags.iter_mut().filter(|t| t.id == id) {
                habit_tag.name = tag.name.clone();
                renamed = true;
            }
            if renamed {
                let habit_id = habit.id;
                state.habits.update(&habit_id, habit).await?;
            }
        }
    }

    Ok(Json(TagDto::from(&tag)))
}

/// `DELETE /tags/{id}`
///
/// The tag is detached from every habit before it is removed. Habits are
/// rewritten from copies taken at the start, with the same last-write-wins
/// caveat as a rename.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    find_tag(&state, &id).await?;

    let mut detached = 0usize;
    for mut habit in state.habits.list().await? {
        if habit.detach_tag(&id) {
            let habit_id = habit.id;
            state.habits.update(&habit_id, habit).await?;
            detached += 1;
        }
    }

    if !state.tags.delete(&id).await? {
        return Err(not_found(id));
    }

    tracing::info!(%id, habits = detached, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_tag(state: &AppState, id: &Uuid) -> Result<Tag, ApiError> {
    state.tags.get(id).await?.ok_or_else(|| not_found(*id))
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::Entity(EntityError::NotFound {
        entity_type: Tag::resource_name_singular().to_string(),
        id,
    })
}

/// Tag names are unique, ignoring case and surrounding whitespace
async fn ensure_unique_name(
    state: &AppState,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), ApiError> {
    let taken = state
        .tags
        .list()
        .await?
        .iter()
        .any(|tag| Some(tag.id) != except && tag.same_name(name));

    if taken {
        return Err(ApiError::Entity(EntityError::AlreadyExists {
            entity_type: Tag::resource_name_singular().to_string(),
            name: name.to_string(),
        }));
    }
    Ok(())
}
