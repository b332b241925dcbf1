//! Alias-based sorting
//!
//! Clients sort with `sort=name desc,createdAt`. Aliases are resolved against
//! the [`SortOptions`] registered for an entity type, producing internal
//! ordering clauses that are applied to an [`EntityQuery`] or a slice.
//!
//! [`EntityQuery`]: crate::core::store::EntityQuery

pub mod apply;
pub mod options;
pub mod validator;

pub use apply::{
    OrderClause, SortDirection, apply_sort, compare_entities, parse_ordering, sort_entities,
    try_apply_sort,
};
pub use options::{SortConfig, SortOptions};
pub use validator::{SortError, validate};
