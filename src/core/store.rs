//! Composable queries over stored entities
//!
//! A store hands out an [`EntityQuery`] over a snapshot of its rows. Callers
//! refine it (filter, order, paginate) and then either [`fetch`] entities or
//! [`select`] a projection and fetch shaped JSON objects instead.
//!
//! [`fetch`]: EntityQuery::fetch
//! [`select`]: EntityQuery::select

use crate::core::entity::Entity;
use crate::shaping::compiler::Projection;
use crate::sorting::apply::{OrderClause, sort_entities};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Deferred query over a set of entities
///
/// Nothing is evaluated until [`count`](Self::count) or
/// [`fetch`](Self::fetch) is called.
pub struct EntityQuery<T> {
    rows: Vec<T>,
    filters: Vec<Predicate<T>>,
    ordering: Vec<OrderClause>,
    window: Option<(usize, usize)>,
}

impl<T> Clone for EntityQuery<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            filters: self.filters.clone(),
            ordering: self.ordering.clone(),
            window: self.window,
        }
    }
}

impl<T> fmt::Debug for EntityQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityQuery")
            .field("rows", &self.rows.len())
            .field("filters", &self.filters.len())
            .field("ordering", &self.ordering)
            .field("window", &self.window)
            .finish()
    }
}

impl<T: Entity> EntityQuery<T> {
    /// Query over the given rows, in their current order
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            rows,
            filters: Vec::new(),
            ordering: Vec::new(),
            window: None,
        }
    }

    /// Keep only rows matching the predicate
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(predicate));
        self
    }

    /// Replace the ordering; the first clause is the primary key
    pub fn order_by(mut self, clauses: Vec<OrderClause>) -> Self {
        self.ordering = clauses;
        self
    }

    /// Restrict the result to one page (pages start at 1)
    pub fn paginate(mut self, page: usize, limit: usize) -> Self {
        self.window = Some((page.max(1), limit.max(1)));
        self
    }

    pub fn ordering(&self) -> &[OrderClause] {
        &self.ordering
    }

    /// Number of rows matching the filters, ignoring pagination
    pub fn count(&self) -> usize {
        self.rows.iter().filter(|row| self.matches(row)).count()
    }

    /// Evaluate the query
    pub fn fetch(self) -> Vec<T> {
        let Self {
            rows,
            filters,
            ordering,
            window,
        } = self;

        let mut rows: Vec<T> = rows
            .into_iter()
            .filter(|row| filters.iter().all(|keep| keep(row)))
            .collect();

        sort_entities(&mut rows, &ordering);

        match window {
            Some((page, limit)) => {
                let start = page.saturating_sub(1).saturating_mul(limit);
                rows.into_iter().skip(start).take(limit).collect()
            }
            None => rows,
        }
    }

    /// Attach a projection; fetching then yields shaped JSON objects
    pub fn select(self, projection: Projection<T>) -> ProjectedQuery<T> {
        ProjectedQuery {
            query: self,
            projection,
        }
    }

    fn matches(&self, row: &T) -> bool {
        self.filters.iter().all(|keep| keep(row))
    }
}

/// An [`EntityQuery`] whose rows are projected into JSON objects
#[derive(Debug, Clone)]
pub struct ProjectedQuery<T> {
    query: EntityQuery<T>,
    projection: Projection<T>,
}

impl<T: Entity> ProjectedQuery<T> {
    pub fn count(&self) -> usize {
        self.query.count()
    }

    pub fn projection(&self) -> &Projection<T> {
        &self.projection
    }

    /// Evaluate the underlying query and project every row
    pub fn fetch(self) -> Vec<Value> {
        let projection = self.projection;
        self.query
            .fetch()
            .iter()
            .map(|row| projection.project(row))
            .collect()
    }
}
