//! Tag entity model

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A label that can be attached to habits
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether two tag names collide (names are unique ignoring case)
    pub fn same_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl Entity for Tag {
    fn resource_name() -> &'static str {
        "tags"
    }

    fn resource_name_singular() -> &'static str {
        "tag"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field_value(&self, path: &str) -> Option<FieldValue> {
        let value: FieldValue = match path {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.as_deref().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}
