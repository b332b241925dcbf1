//! Entity trait defining the core abstraction for stored types

use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities in the system.
///
/// This trait provides the metadata the storage and sorting layers need
/// for any entity type:
/// - id: Unique identifier
/// - created_at / updated_at: Timestamps managed by the store
/// - field_value: Dynamic access to sortable fields
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs and configuration (e.g., "habits")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "habit")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Get the value of a field by its internal path
    ///
    /// Paths are the targets of sort aliases (e.g., `"target.value"`).
    /// Returns `None` when the path is unknown to the entity.
    fn field_value(&self, path: &str) -> Option<FieldValue>;

    /// Whether the entity matches a free-text search term
    ///
    /// The default implementation matches nothing, so stores fall back to
    /// returning every row when no override exists.
    fn matches_search(&self, _term: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestEntity {
        id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
    }

    impl Entity for TestEntity {
        fn resource_name() -> &'static str {
            "test_entities"
        }

        fn resource_name_singular() -> &'static str {
            "test_entity"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn field_value(&self, path: &str) -> Option<FieldValue> {
            match path {
                "name" => Some(FieldValue::from(self.name.as_str())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_entity_metadata() {
        assert_eq!(TestEntity::resource_name(), "test_entities");
        assert_eq!(TestEntity::resource_name_singular(), "test_entity");
    }

    #[test]
    fn test_field_value_lookup() {
        let entity = TestEntity {
            id: Uuid::new_v4(),
            name: "Read".to_string(),
            created_at: Utc::now(),
        };

        assert_eq!(
            entity.field_value("name"),
            Some(FieldValue::String("Read".to_string()))
        );
        assert_eq!(entity.field_value("unknown"), None);
        assert!(!entity.matches_search("Read"));
    }
}
