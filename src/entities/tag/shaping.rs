//! Field mapping and sort aliases for tags

use super::dto::TagDto;
use super::model::Tag;
use crate::entities::habit::shaping::json;
use crate::registry::{MappingConfigurator, SortConfigurator};
use crate::shaping::mapping::MappingConfiguration;
use crate::sorting::options::SortOptions;

pub struct TagMapping;

impl MappingConfigurator for TagMapping {
    type Entity = Tag;
    type Dto = TagDto;

    fn configure(config: &mut MappingConfiguration<Tag>) {
        config
            .map("id", |t: &Tag| t.id.to_string())
            .map("name", |t: &Tag| t.name.clone())
            .map("description", |t: &Tag| json(&t.description))
            .map("createdAt", |t: &Tag| json(&t.created_at))
            .map("updatedAt", |t: &Tag| json(&t.updated_at));
    }
}

pub struct TagSort;

impl SortConfigurator for TagSort {
    type Entity = Tag;

    fn sort_options() -> SortOptions {
        SortOptions::new()
            .with_alias("id", "id")
            .with_alias("name", "name")
            .with_alias("createdAt", "created_at")
            .with_alias("updatedAt", "updated_at")
            .with_default("name asc")
    }
}
