//! Validation of alias-based sort strings

use super::options::SortOptions;
use thiserror::Error;

/// A sort string that does not fit the registered aliases
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("invalid sort field '{field}'")]
    InvalidField { field: String },

    #[error("invalid sort direction '{direction}' for field '{field}', expected 'asc' or 'desc'")]
    InvalidDirection { field: String, direction: String },
}

/// Translate an alias sort string into internal ordering clauses
///
/// `"name desc, created"` becomes `"name desc,created_at asc"`. A blank
/// input falls back to the default sort of `options`; when that is unset too
/// the result is `None`, meaning no ordering was requested.
pub fn validate(sort: Option<&str>, options: &SortOptions) -> Result<Option<String>, SortError> {
    let requested = sort.filter(|s| !s.trim().is_empty());
    let Some(sort) = requested.or(options.default_sort()) else {
        return Ok(None);
    };

    let mut clauses = Vec::new();

    for clause in sort.split(',') {
        let mut parts = clause.split_whitespace();
        let Some(alias) = parts.next() else {
            continue;
        };

        let path = options.resolve(alias).ok_or_else(|| SortError::InvalidField {
            field: alias.to_string(),
        })?;

        let rest: Vec<&str> = parts.collect();
        let direction = match rest[..] {
            [] => "asc",
            [direction] if direction.eq_ignore_ascii_case("asc") => "asc",
            [direction] if direction.eq_ignore_ascii_case("desc") => "desc",
            _ => {
                return Err(SortError::InvalidDirection {
                    field: alias.to_string(),
                    direction: rest.join(" "),
                });
            }
        };

        clauses.push(format!("{path} {direction}"));
    }

    if clauses.is_empty() {
        return Ok(None);
    }

    Ok(Some(clauses.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SortOptions {
        SortOptions::new()
            .with_alias("id", "id")
            .with_alias("name", "name")
            .with_alias("createdAt", "created_at")
    }

    #[test]
    fn test_blank_uses_default() {
        let options = options().with_default("id asc");
        assert_eq!(validate(Some("  "), &options), Ok(Some("id asc".to_string())));
        assert_eq!(validate(None, &options), Ok(Some("id asc".to_string())));
    }

    #[test]
    fn test_blank_without_default_is_no_ordering() {
        assert_eq!(validate(None, &options()), Ok(None));
        assert_eq!(validate(Some(""), &options()), Ok(None));
    }

    #[test]
    fn test_maps_aliases_in_clause_order() {
        assert_eq!(
            validate(Some("name desc, createdAt"), &options()),
            Ok(Some("name desc,created_at asc".to_string()))
        );
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        assert_eq!(
            validate(Some("NAME DESC"), &options()),
            Ok(Some("name desc".to_string()))
        );
    }

    #[test]
    fn test_unknown_alias() {
        assert_eq!(
            validate(Some("bogus"), &options()),
            Err(SortError::InvalidField {
                field: "bogus".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_direction() {
        let err = validate(Some("name sideways"), &options()).unwrap_err();
        assert_eq!(
            err,
            SortError::InvalidDirection {
                field: "name".to_string(),
                direction: "sideways".to_string()
            }
        );
    }

    #[test]
    fn test_extra_words_are_an_invalid_direction() {
        let err = validate(Some("name asc please"), &options()).unwrap_err();
        assert!(matches!(err, SortError::InvalidDirection { .. }));
    }

    #[test]
    fn test_empty_clauses_are_skipped() {
        assert_eq!(
            validate(Some("name,,id desc"), &options()),
            Ok(Some("name asc,id desc".to_string()))
        );
        assert_eq!(validate(Some(" , "), &options()), Ok(None));
    }
}
