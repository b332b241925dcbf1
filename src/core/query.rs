//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

/// Query parameters for listing, shaping and sorting
///
/// This structure is used to extract shaping, sorting and pagination
/// parameters from URL query strings. All parameters are optional.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_habits(
///     Query(params): Query<QueryParams>,
/// ) -> Result<Json<PaginatedResponse<Value>>, ApiError> {
///     // params.page() defaults to 1
///     // params.limit(default, max) falls back to the configured default
/// }
///
/// // Usage:
/// GET /habits?page=2&limit=10
/// GET /habits?fields=name,target.value&sort=name desc
/// GET /habits?excludeFields=tags,milestone&q=run
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QueryParams {
    /// Comma-separated dot paths to include
    pub fields: Option<String>,

    /// Comma-separated dot paths to exclude
    #[serde(rename = "excludeFields", alias = "exclude_fields")]
    pub exclude_fields: Option<String>,

    /// Alias sort string
    ///
    /// # Format
    /// - `alias` or `alias asc` (ascending)
    /// - `alias desc` (descending)
    /// - several clauses separated by commas, primary key first
    ///
    /// # Example
    /// ```text
    /// sort=name desc,createdAt
    /// ```
    pub sort: Option<String>,

    /// Free-text search term
    pub q: Option<String>,

    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of items per page
    pub limit: Option<usize>,
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, falling back to `default` and never exceeding `max`
    pub fn limit(&self, default: usize, max: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, max.max(1))
    }

    /// Search term, if one was given and is not blank
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Paginated response structure
///
/// This structure wraps paginated data with metadata about pagination state.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(20, 100), 20);
        assert_eq!(params.search(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = QueryParams {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(params.limit(20, 100), 100);

        let params = QueryParams {
            limit: Some(0),
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(params.limit(20, 100), 1);
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_exclude_fields_uses_camel_case() {
        let params: QueryParams =
            serde_json::from_str(r#"{"excludeFields": "tags", "q": "  "}"#).unwrap();
        assert_eq!(params.exclude_fields.as_deref(), Some("tags"));
        assert_eq!(params.search(), None);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_pagination_meta_last_page() {
        let meta = PaginationMeta::new(8, 20, 145);
        assert!(meta.has_prev);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_pagination_meta_huge_page() {
        let meta = PaginationMeta::new(usize::MAX, 20, 145);
        assert_eq!(meta.page, usize::MAX);
        assert!(meta.has_prev);
        assert!(!meta.has_next);
    }
}
