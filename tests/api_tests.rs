//! HTTP-level tests for the habit and tag endpoints
//!
//! Each test starts a server over seeded in-memory stores and drives it
//! through JSON requests, checking shaping, sorting, pagination and errors.

use axum::http::StatusCode;
use axum_test::TestServer;
use habits::entities::habit::{Frequency, FrequencyType, HabitTag, HabitType, Target};
use habits::prelude::*;
use serde_json::{Value, json};

struct Fixture {
    server: TestServer,
    run: Uuid,
    read: Uuid,
    health: Uuid,
}

fn daily() -> Frequency {
    Frequency {
        frequency_type: FrequencyType::Daily,
        times_per_period: 1,
    }
}

fn measurable(name: &str, value: f64, unit: &str) -> Habit {
    let mut habit = Habit::new(name, HabitType::Measurable, daily());
    habit.target = Some(Target {
        value,
        unit: unit.to_string(),
    });
    habit
}

fn fixture_with(config: AppConfig) -> Fixture {
    let health = Tag::new("health", Some("Body and mind".to_string()));
    let learning = Tag::new("learning", None);

    let mut run = measurable("Run", 5.0, "km");
    run.tags = vec![HabitTag::from(&health)];

    let mut read = Habit::new(
        "Read",
        HabitType::Binary,
        Frequency {
            frequency_type: FrequencyType::Weekly,
            times_per_period: 3,
        },
    );
    read.description = "A chapter before bed".to_string();
    read.tags = vec![HabitTag::from(&learning), HabitTag::from(&health)];

    let meditate = measurable("Meditate", 10.0, "minutes");

    let ids = (run.id, read.id, health.id);
    let router = ServerBuilder::new()
        .with_config(config)
        .with_habit_service(InMemoryDataService::with_entities(vec![run, read, meditate]))
        .with_tag_service(InMemoryDataService::with_entities(vec![health, learning]))
        .build()
        .unwrap();

    Fixture {
        server: TestServer::try_new(router).unwrap(),
        run: ids.0,
        read: ids.1,
        health: ids.2,
    }
}

fn fixture() -> Fixture {
    fixture_with(AppConfig::default_config())
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

// =============================================================================
// Habit listing
// =============================================================================

mod list_habits {
    use super::*;

    #[tokio::test]
    async fn test_default_sort_and_pagination() {
        let f = fixture();

        let response = f.server.get("/habits").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(names(&body), vec!["Meditate", "Read", "Run"]);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 20);
    }

    #[tokio::test]
    async fn test_full_items_match_dto() {
        let f = fixture();

        let body: Value = f.server.get("/habits").add_query_param("q", "run").await.json();
        let item = &body["data"][0];

        assert_eq!(item["id"], f.run.to_string());
        assert_eq!(item["type"], "measurable");
        assert_eq!(item["frequency"], json!({"type": "daily", "timesPerPeriod": 1}));
        assert_eq!(item["target"], json!({"value": 5.0, "unit": "km"}));
        assert_eq!(item["tags"][0]["name"], "health");
        assert_eq!(item["isArchived"], false);
    }

    #[tokio::test]
    async fn test_include_fields() {
        let f = fixture();

        let response = f
            .server
            .get("/habits")
            .add_query_param("fields", "name,target.value")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        for item in body["data"].as_array().unwrap() {
            assert_eq!(keys(item), vec!["name", "target"]);
        }

        // Meditate, Read, Run
        assert_eq!(body["data"][0]["target"], json!({"value": 10.0}));
        assert_eq!(body["data"][1]["target"], Value::Null);
        assert_eq!(body["data"][2]["target"], json!({"value": 5.0}));
    }

    #[tokio::test]
    async fn test_field_names_ignore_case() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/habits")
            .add_query_param("fields", "NAME,Frequency.TYPE")
            .await
            .json();

        assert_eq!(body["data"][0], json!({"name": "Meditate", "frequency": {"type": "daily"}}));
    }

    #[tokio::test]
    async fn test_collection_subfields() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/habits")
            .add_query_param("fields", "tags.name")
            .add_query_param("q", "read")
            .await
            .json();

        assert_eq!(
            body["data"][0],
            json!({"tags": [{"name": "learning"}, {"name": "health"}]})
        );
    }

    #[tokio::test]
    async fn test_exclude_fields() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/habits")
            .add_query_param("excludeFields", "tags,frequency.timesPerPeriod")
            .await
            .json();

        let item = &body["data"][0];
        assert!(item.get("tags").is_none());
        assert_eq!(item["frequency"], json!({"type": "daily"}));
        assert_eq!(item["name"], "Meditate");
        assert!(item.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_include_and_exclude_combined() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/habits")
            .add_query_param("fields", "name,frequency")
            .add_query_param("excludeFields", "frequency.type")
            .await
            .json();

        assert_eq!(
            body["data"][0],
            json!({"name": "Meditate", "frequency": {"timesPerPeriod": 1}})
        );
    }

    #[tokio::test]
    async fn test_overlapping_fields_rejected() {
        let f = fixture();

        let response = f
            .server
            .get("/habits")
            .add_query_param("fields", "name,status")
            .add_query_param("excludeFields", "NAME")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "FIELD_CONFLICT");
    }

    #[tokio::test]
    async fn test_unknown_field_rejected() {
        let f = fixture();

        let response = f.server.get("/habits").add_query_param("fields", "name,nope").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_FIELDS");
        assert_eq!(body["details"]["field"], "nope");
    }

    #[tokio::test]
    async fn test_unknown_nested_field_rejected() {
        let f = fixture();

        let response = f
            .server
            .get("/habits")
            .add_query_param("fields", "target.weight")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_FIELDS");
    }

    #[tokio::test]
    async fn test_sort_by_alias() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/habits")
            .add_query_param("sort", "targetValue desc")
            .await
            .json();

        // habits without a target sort first ascending, so last descending
        assert_eq!(names(&body), vec!["Meditate", "Run", "Read"]);
    }

    #[tokio::test]
    async fn test_sort_by_several_aliases() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/habits")
            .add_query_param("sort", "type desc, name desc")
            .await
            .json();

        assert_eq!(names(&body), vec!["Run", "Meditate", "Read"]);
    }

    #[tokio::test]
    async fn test_invalid_sort_rejected() {
        let f = fixture();

        let response = f.server.get("/habits").add_query_param("sort", "weight").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_SORT");
        assert_eq!(body["details"]["field"], "weight");

        let response = f.server.get("/habits").add_query_param("sort", "name sideways").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let f = fixture();

        let body: Value = f.server.get("/habits?page=2&limit=2").await.json();

        assert_eq!(names(&body), vec!["Run"]);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["total_pages"], 2);
        assert_eq!(body["pagination"]["has_prev"], true);
        assert_eq!(body["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_limit_is_capped() {
        let f = fixture_with(AppConfig {
            pagination: habits::config::PaginationConfig {
                default_limit: 2,
                max_limit: 2,
            },
            ..AppConfig::default_config()
        });

        let body: Value = f.server.get("/habits?limit=50").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["limit"], 2);
    }

    #[tokio::test]
    async fn test_search() {
        let f = fixture();

        let body: Value = f.server.get("/habits").add_query_param("q", "CHAPTER").await.json();
        assert_eq!(names(&body), vec!["Read"]);
        assert_eq!(body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_configured_sort_override() {
        let config = AppConfig::from_yaml_str(
            "sorting:\n  habits:\n    default: name desc\n    aliases:\n      unit: target.unit\n",
        )
        .unwrap();
        let f = fixture_with(config);

        let body: Value = f.server.get("/habits").await.json();
        assert_eq!(names(&body), vec!["Run", "Read", "Meditate"]);

        let body: Value = f.server.get("/habits").add_query_param("sort", "unit").await.json();
        assert_eq!(names(&body), vec!["Read", "Run", "Meditate"]);
    }

    #[test]
    fn test_configured_default_sort_must_resolve() {
        let config =
            AppConfig::from_yaml_str("sorting:\n  habits:\n    default: bogus asc\n").unwrap();

        let result = ServerBuilder::new().with_config(config).build();
        let err = result.err().unwrap();
        assert!(err.to_string().contains("bogus asc"));
    }

    #[tokio::test]
    async fn test_huge_page_is_empty() {
        let f = fixture();

        let response = f
            .server
            .get("/habits")
            .add_query_param("page", "18446744073709551615")
            .add_query_param("limit", "20")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["has_next"], false);

        let response = f.server.get("/tags?page=18446744073709551615").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_shaped_keys_follow_request_order() {
        let f = fixture();

        let text = f
            .server
            .get("/habits")
            .add_query_param("fields", "tags.name,name")
            .await
            .text();

        assert!(text.contains(r#"{"tags":[],"name":"Meditate"}"#), "{text}");
        assert!(
            text.contains(r#"{"tags":[{"name":"learning"},{"name":"health"}],"name":"Read"}"#),
            "{text}"
        );
    }
}

// =============================================================================
// Single habits
// =============================================================================

mod habit_crud {
    use super::*;

    #[tokio::test]
    async fn test_get_shaped() {
        let f = fixture();

        let response = f
            .server
            .get(&format!("/habits/{}", f.run))
            .add_query_param("fields", "name,target")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body, json!({"name": "Run", "target": {"value": 5.0, "unit": "km"}}));
    }

    #[tokio::test]
    async fn test_get_excluding_fields() {
        let f = fixture();

        let body: Value = f
            .server
            .get(&format!("/habits/{}", f.read))
            .add_query_param("excludeFields", "tags,description")
            .await
            .json();

        assert!(body.get("tags").is_none());
        assert!(body.get("description").is_none());
        assert_eq!(body["target"], Value::Null);
    }

    #[tokio::test]
    async fn test_get_errors() {
        let f = fixture();

        let response = f.server.get("/habits/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = f.server.get(&format!("/habits/{}", Uuid::new_v4())).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create() {
        let f = fixture();

        let response = f
            .server
            .post("/habits")
            .json(&json!({
                "name": "Swim",
                "type": "measurable",
                "frequency": {"type": "weekly", "timesPerPeriod": 2},
                "target": {"value": 1.5, "unit": "km"},
                "milestone": {"target": 10},
                "tagIds": [f.health, f.health]
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["name"], "Swim");
        assert_eq!(body["status"], "ongoing");
        assert_eq!(body["milestone"], json!({"target": 10, "current": 0}));
        assert_eq!(body["tags"], json!([{"id": f.health, "name": "health"}]));

        let list: Value = f.server.get("/habits").await.json();
        assert_eq!(list["pagination"]["total"], 4);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let f = fixture();

        let response = f
            .server
            .post("/habits")
            .json(&json!({
                "name": "Swim",
                "type": "measurable",
                "frequency": {"type": "weekly", "timesPerPeriod": 2}
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let response = f
            .server
            .post("/habits")
            .json(&json!({
                "name": "",
                "type": "binary",
                "frequency": {"type": "daily", "timesPerPeriod": 1}
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_malformed_body() {
        let f = fixture();

        let response = f
            .server
            .post("/habits")
            .json(&json!({"name": "Swim", "type": "sometimes"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_with_unknown_tag() {
        let f = fixture();

        let response = f
            .server
            .post("/habits")
            .json(&json!({
                "name": "Journal",
                "type": "binary",
                "frequency": {"type": "daily", "timesPerPeriod": 1},
                "tagIds": [Uuid::new_v4()]
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_REFERENCE");
    }

    #[tokio::test]
    async fn test_update() {
        let f = fixture();

        let response = f
            .server
            .put(&format!("/habits/{}", f.run))
            .json(&json!({"name": "Long run", "isArchived": true, "status": "completed"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["name"], "Long run");
        assert_eq!(body["isArchived"], true);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["target"]["unit"], "km");
    }

    #[tokio::test]
    async fn test_update_rejects_inconsistent_target() {
        let f = fixture();

        let response = f
            .server
            .put(&format!("/habits/{}", f.read))
            .json(&json!({"target": {"value": 1.0, "unit": "book"}}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = f
            .server
            .put(&format!("/habits/{}", Uuid::new_v4()))
            .json(&json!({"name": "Ghost"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_replace_tags() {
        let f = fixture();

        let response = f
            .server
            .put(&format!("/habits/{}/tags", f.read))
            .json(&json!({"tagIds": [f.health]}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["tags"], json!([{"id": f.health, "name": "health"}]));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture();

        let response = f.server.delete(&format!("/habits/{}", f.run)).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = f.server.get(&format!("/habits/{}", f.run)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = f.server.delete(&format!("/habits/{}", f.run)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Tags
// =============================================================================

mod tags {
    use super::*;

    #[tokio::test]
    async fn test_list_shaped_in_memory() {
        let f = fixture();

        let body: Value = f
            .server
            .get("/tags")
            .add_query_param("fields", "name")
            .add_query_param("sort", "name desc")
            .await
            .json();

        assert_eq!(body["data"], json!([{"name": "learning"}, {"name": "health"}]));
        assert_eq!(body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn test_excluding_every_field_rejected() {
        let f = fixture();

        let response = f
            .server
            .get("/tags")
            .add_query_param("excludeFields", "id,name,description,createdAt,updatedAt")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "FIELD_CONFLICT");
    }

    #[tokio::test]
    async fn test_get_with_exclude() {
        let f = fixture();

        let body: Value = f
            .server
            .get(&format!("/tags/{}", f.health))
            .add_query_param("excludeFields", "createdAt,updatedAt,id")
            .await
            .json();

        assert_eq!(body, json!({"name": "health", "description": "Body and mind"}));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let f = fixture();

        let response = f.server.post("/tags").json(&json!({"name": " Health "})).await;
        response.assert_status(StatusCode::CONFLICT);

        let response = f.server.post("/tags").json(&json!({"name": "sleep"})).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["name"], "sleep");
    }

    #[tokio::test]
    async fn test_rename_reaches_habits() {
        let f = fixture();

        let response = f
            .server
            .put(&format!("/tags/{}", f.health))
            .json(&json!({"name": "fitness"}))
            .await;
        response.assert_status_ok();

        let habit: Value = f
            .server
            .get(&format!("/habits/{}", f.read))
            .add_query_param("fields", "tags.name")
            .await
            .json();
        assert_eq!(habit, json!({"tags": [{"name": "learning"}, {"name": "fitness"}]}));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_conflicts() {
        let f = fixture();

        let response = f
            .server
            .put(&format!("/tags/{}", f.health))
            .json(&json!({"name": "LEARNING"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_detaches_from_habits() {
        let f = fixture();

        let response = f.server.delete(&format!("/tags/{}", f.health)).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let habit: Value = f.server.get(&format!("/habits/{}", f.run)).await.json();
        assert_eq!(habit["tags"], json!([]));

        let response = f.server.get(&format!("/tags/{}", f.health)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Meta and health
// =============================================================================

mod meta {
    use super::*;

    #[tokio::test]
    async fn test_habit_fields() {
        let f = fixture();

        let response = f.server.get("/meta/habits/fields").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["resource"], "habits");

        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(fields.contains(&"target.value"));
        assert!(fields.contains(&"tags.name"));
        assert_eq!(body["sort"]["default"], "name asc");
        assert_eq!(body["sort"]["aliases"]["targetValue"], "target.value");
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let f = fixture();

        let response = f.server.get("/meta/goals/fields").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["code"], "UNKNOWN_RESOURCE");
    }

    #[tokio::test]
    async fn test_health() {
        let f = fixture();

        let body: Value = f.server.get("/health").await.json();
        assert_eq!(body["status"], "ok");
    }
}
