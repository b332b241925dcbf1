//! Include, exclude and combined field shaping
//!
//! Every operation comes in two flavours:
//! - over materialised DTOs (`include_fields`, `exclude_fields`,
//!   `shape_fields`), reshaping their serialized form through an [`Accessor`]
//! - over an [`EntityQuery`] (`*_query`), attaching a [`Projection`] built from
//!   a [`MappingConfiguration`] so rows are shaped while being fetched
//!
//! Blank field strings are a no-op. The `try_*` forms report user errors as
//! [`Attempt::Rejected`] and only return `Err` for internal failures.
//!
//! [`Accessor`]: super::compiler::Accessor
//! [`Projection`]: super::compiler::Projection

use super::compiler::{compile_accessor, compile_projection};
use super::error::{ShapeConflictError, ShapingError};
use super::grouped::{GroupedRequest, Selection};
use super::mapping::MappingConfiguration;
use super::schema::{Schema, ShapeSchema};
use super::tokenizer::{is_blank, tokenize};
use super::validator::validate;
use crate::core::entity::Entity;
use crate::core::error::Attempt;
use crate::core::store::{EntityQuery, ProjectedQuery};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Planning
// =============================================================================

/// Resolve include and exclude strings into the request to compile
///
/// `None` means nothing was asked for and the source passes through
/// unchanged.
pub fn plan(
    include: Option<&str>,
    exclude: Option<&str>,
    schema: &Schema,
) -> Result<Option<GroupedRequest>, ShapingError> {
    let include_tokens = tokens(include);
    let exclude_tokens = tokens(exclude);

    let overlap: Vec<String> = include_tokens
        .iter()
        .filter(|token| exclude_tokens.iter().any(|ex| ex.eq_ignore_ascii_case(token)))
        .cloned()
        .collect();
    if !overlap.is_empty() {
        return Err(ShapeConflictError::Overlap { tokens: overlap }.into());
    }

    let included = validate(&include_tokens, schema)?;
    let excluded = validate(&exclude_tokens, schema)?;

    let request = match (included.is_empty(), excluded.is_empty()) {
        (true, true) => return Ok(None),
        (false, true) => return Ok(Some(included)),
        (true, false) => complement(schema, &excluded),
        (false, false) => difference(&included, &excluded, schema),
    };

    if request.is_empty() {
        return Err(ShapeConflictError::EmptyResult.into());
    }

    tracing::debug!(fields = ?request.names().collect::<Vec<_>>(), "resolved field shaping");
    Ok(Some(request))
}

fn tokens(input: Option<&str>) -> Vec<String> {
    match input {
        Some(input) if !is_blank(Some(input)) => tokenize(input),
        _ => Vec::new(),
    }
}

/// Every declared field not excluded, in declaration order
fn complement(schema: &Schema, excluded: &GroupedRequest) -> GroupedRequest {
    let mut request = GroupedRequest::new();

    for field in schema.fields() {
        match excluded.get(&field.name) {
            None => request.request_whole(&field.name),
            Some(Selection::Whole) => {}
            Some(Selection::Partial(removed)) => {
                let remaining = nested_remainder(schema, &field.name, removed);
                if !remaining.is_empty() {
                    request.insert(&field.name, Selection::Partial(remaining));
                }
            }
        }
    }

    request
}

/// Included fields minus excluded ones, in include order
fn difference(
    included: &GroupedRequest,
    excluded: &GroupedRequest,
    schema: &Schema,
) -> GroupedRequest {
    let mut request = GroupedRequest::new();

    for (top, selection) in included.iter() {
        let kept = match (selection, excluded.get(top)) {
            (selection, None) => Some(selection.clone()),
            (_, Some(Selection::Whole)) => None,
            (Selection::Whole, Some(Selection::Partial(removed))) => {
                Some(nested_remainder(schema, top, removed))
                    .filter(|r| !r.is_empty())
                    .map(Selection::Partial)
            }
            (Selection::Partial(names), Some(Selection::Partial(removed))) => {
                let remaining: Vec<String> = names
                    .iter()
                    .filter(|name| !removed.contains(name))
                    .cloned()
                    .collect();
                Some(remaining).filter(|r| !r.is_empty()).map(Selection::Partial)
            }
        };

        if let Some(selection) = kept {
            request.insert(top, selection);
        }
    }

    request
}

fn nested_remainder(schema: &Schema, top: &str, removed: &[String]) -> Vec<String> {
    schema
        .field(top)
        .and_then(|field| field.kind.nested_schema())
        .map(|nested| {
            nested
                .names()
                .filter(|name| !removed.iter().any(|r| r == name))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn attempt<T>(result: Result<T, ShapingError>) -> Result<Attempt<T>, ShapingError> {
    match result {
        Ok(value) => Ok(Attempt::Done(value)),
        Err(err) if err.is_user_error() => Ok(Attempt::Rejected(err.to_string())),
        Err(err) => Err(err),
    }
}

// =============================================================================
// In-memory shaping
// =============================================================================

/// Shape DTOs keeping only the requested fields
pub fn include_fields<D>(source: &[D], fields: Option<&str>) -> Result<Vec<Value>, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    shape_fields(source, fields, None)
}

/// Shape DTOs dropping the excluded fields
///
/// Excluding every field is rejected with
/// [`ShapeConflictError::EmptyResult`] rather than yielding empty objects.
pub fn exclude_fields<D>(source: &[D], exclude: Option<&str>) -> Result<Vec<Value>, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    shape_fields(source, None, exclude)
}

/// Shape DTOs by an include set, an exclude set, or both
pub fn shape_fields<D>(
    source: &[D],
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<Vec<Value>, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    let schema = D::schema();

    let Some(request) = plan(include, exclude, schema)? else {
        return source
            .iter()
            .map(|item| serde_json::to_value(item).map_err(ShapingError::from))
            .collect();
    };

    let accessor = compile_accessor(&request, schema)?;
    source
        .iter()
        .map(|item| Ok(accessor.apply(&serde_json::to_value(item)?)))
        .collect()
}

/// Shape a single DTO
pub fn shape_object<D>(
    source: &D,
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<Value, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    let mut shaped = shape_fields(std::slice::from_ref(source), include, exclude)?;
    Ok(shaped.pop().unwrap_or(Value::Null))
}

pub fn try_include_fields<D>(
    source: &[D],
    fields: Option<&str>,
) -> Result<Attempt<Vec<Value>>, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    attempt(include_fields(source, fields))
}

pub fn try_exclude_fields<D>(
    source: &[D],
    exclude: Option<&str>,
) -> Result<Attempt<Vec<Value>>, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    attempt(exclude_fields(source, exclude))
}

pub fn try_shape_fields<D>(
    source: &[D],
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<Attempt<Vec<Value>>, ShapingError>
where
    D: Serialize + ShapeSchema,
{
    attempt(shape_fields(source, include, exclude))
}

// =============================================================================
// Query shaping
// =============================================================================

/// Project a query keeping only the requested fields
pub fn include_fields_query<E: Entity>(
    query: EntityQuery<E>,
    fields: Option<&str>,
    config: &MappingConfiguration<E>,
) -> Result<ProjectedQuery<E>, ShapingError> {
    shape_fields_query(query, fields, None, config)
}

/// Project a query dropping the excluded fields
///
/// Like [`exclude_fields`], excluding every field is a conflict.
pub fn exclude_fields_query<E: Entity>(
    query: EntityQuery<E>,
    exclude: Option<&str>,
    config: &MappingConfiguration<E>,
) -> Result<ProjectedQuery<E>, ShapingError> {
    shape_fields_query(query, None, exclude, config)
}

/// Project a query by an include set, an exclude set, or both
///
/// With nothing requested the projection covers every configured field in
/// declaration order.
pub fn shape_fields_query<E: Entity>(
    query: EntityQuery<E>,
    include: Option<&str>,
    exclude: Option<&str>,
    config: &MappingConfiguration<E>,
) -> Result<ProjectedQuery<E>, ShapingError> {
    let request =
        plan(include, exclude, config.schema())?.unwrap_or_else(|| config.full_request());
    let projection = compile_projection(&request, config)?;
    Ok(query.select(projection))
}

pub fn try_include_fields_query<E: Entity>(
    query: EntityQuery<E>,
    fields: Option<&str>,
    config: &MappingConfiguration<E>,
) -> Result<Attempt<ProjectedQuery<E>>, ShapingError> {
    attempt(include_fields_query(query, fields, config))
}

pub fn try_exclude_fields_query<E: Entity>(
    query: EntityQuery<E>,
    exclude: Option<&str>,
    config: &MappingConfiguration<E>,
) -> Result<Attempt<ProjectedQuery<E>>, ShapingError> {
    attempt(exclude_fields_query(query, exclude, config))
}

pub fn try_shape_fields_query<E: Entity>(
    query: EntityQuery<E>,
    include: Option<&str>,
    exclude: Option<&str>,
    config: &MappingConfiguration<E>,
) -> Result<Attempt<ProjectedQuery<E>>, ShapingError> {
    attempt(shape_fields_query(query, include, exclude, config))
}
