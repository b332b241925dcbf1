//! Path validation against a schema

use super::error::FieldError;
use super::grouped::GroupedRequest;
use super::schema::Schema;
use super::tokenizer::FieldPath;

/// Check tokens against a schema and group them by top-level field
///
/// Names are resolved case-insensitively and recorded under their canonical
/// schema spelling. A single-segment token requests the whole field, which
/// wins over any nested request for the same field.
pub fn validate(tokens: &[String], schema: &Schema) -> Result<GroupedRequest, FieldError> {
    let mut request = GroupedRequest::new();

    for token in tokens {
        let Some(path) = FieldPath::parse(token)? else {
            continue;
        };

        let field = schema.field(path.top).ok_or_else(|| FieldError::NotMapped {
            token: token.clone(),
        })?;

        let Some(nested) = path.nested else {
            request.request_whole(&field.name);
            continue;
        };

        if request.get(&field.name).is_some_and(|s| s.is_whole()) {
            continue;
        }

        let nested_field = field
            .kind
            .nested_schema()
            .and_then(|schema| schema.field(nested))
            .ok_or_else(|| FieldError::NestedNotMapped {
                token: token.clone(),
                parent: field.name.clone(),
                nested: nested.to_string(),
            })?;

        request.request_nested(&field.name, &nested_field.name);
    }

    Ok(request)
}
