//! Request payloads for tag endpoints

use super::model::Tag;
use serde::Deserialize;
use validator::Validate;

/// Body of `POST /tags`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(length(max = 200))]
    pub description: Option<String>,
}

impl CreateTagRequest {
    pub fn into_tag(self) -> Tag {
        Tag::new(self.name.trim(), self.description)
    }
}

/// Body of `PUT /tags/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,

    #[validate(length(max = 200))]
    pub description: Option<String>,
}

impl UpdateTagRequest {
    pub fn apply(self, tag: &mut Tag) {
        if let Some(name) = self.name {
            tag.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            tag.description = Some(description);
        }
        tag.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length() {
        let request = CreateTagRequest {
            name: String::new(),
            description: None,
        };
        assert!(request.validate().is_err());

        let request = CreateTagRequest {
            name: " health ".to_string(),
            description: None,
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.into_tag().name, "health");
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut tag = Tag::new("health", Some("body and mind".to_string()));
        UpdateTagRequest {
            name: Some("fitness".to_string()),
            description: None,
        }
        .apply(&mut tag);

        assert_eq!(tag.name, "fitness");
        assert_eq!(tag.description.as_deref(), Some("body and mind"));
    }
}
