//! Ordering clauses and their application

use super::options::SortOptions;
use super::validator::{SortError, validate};
use crate::core::entity::Entity;
use crate::core::error::Attempt;
use crate::core::field::FieldValue;
use crate::core::store::EntityQuery;
use std::cmp::Ordering;

/// Direction of one ordering clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a multi-key ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub path: String,
    pub direction: SortDirection,
}

impl OrderClause {
    pub fn asc(path: &str) -> Self {
        Self {
            path: path.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(path: &str) -> Self {
        Self {
            path: path.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// Parse validated `"path direction"` clauses
///
/// The input is the output of [`validate`]; the first clause is the primary
/// sort key.
pub fn parse_ordering(ordering: &str) -> Vec<OrderClause> {
    ordering
        .split(',')
        .filter_map(|clause| {
            let mut parts = clause.split_whitespace();
            let path = parts.next()?;
            let direction = match parts.next() {
                Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Descending,
                _ => SortDirection::Ascending,
            };
            Some(OrderClause {
                path: path.to_string(),
                direction,
            })
        })
        .collect()
}

/// Compare two entities clause by clause
pub fn compare_entities<E: Entity>(a: &E, b: &E, clauses: &[OrderClause]) -> Ordering {
    for clause in clauses {
        let left = a.field_value(&clause.path).unwrap_or(FieldValue::Null);
        let right = b.field_value(&clause.path).unwrap_or(FieldValue::Null);

        let ordering = match clause.direction {
            SortDirection::Ascending => left.compare(&right),
            SortDirection::Descending => right.compare(&left),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Stable multi-key sort of a slice
pub fn sort_entities<E: Entity>(items: &mut [E], clauses: &[OrderClause]) {
    if clauses.is_empty() {
        return;
    }
    items.sort_by(|a, b| compare_entities(a, b, clauses));
}

/// Validate an alias sort string and order the query by it
pub fn apply_sort<E: Entity>(
    query: EntityQuery<E>,
    sort: Option<&str>,
    options: &SortOptions,
) -> Result<EntityQuery<E>, SortError> {
    match validate(sort, options)? {
        Some(ordering) => {
            tracing::debug!(entity = E::resource_name(), %ordering, "applying sort");
            Ok(query.order_by(parse_ordering(&ordering)))
        }
        None => Ok(query),
    }
}

/// Non-failing form of [`apply_sort`]
pub fn try_apply_sort<E: Entity>(
    query: EntityQuery<E>,
    sort: Option<&str>,
    options: &SortOptions,
) -> Attempt<EntityQuery<E>> {
    match apply_sort(query, sort, options) {
        Ok(query) => Attempt::Done(query),
        Err(err) => Attempt::Rejected(err.to_string()),
    }
}
