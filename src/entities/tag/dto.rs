//! Wire representation of tags

use super::model::Tag;
use crate::shaping::schema::{Schema, ShapeSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Tag> for TagDto {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            description: tag.description.clone(),
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

impl ShapeSchema for TagDto {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .scalar("id")
                .scalar("name")
                .scalar("description")
                .scalar("createdAt")
                .scalar("updatedAt")
        })
    }
}
