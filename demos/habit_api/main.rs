//! Habit API with a few seeded habits and tags
//!
//! Run with:
//!
//! ```text
//! cargo run --example habit_api -- demos/habit_api/habits.yaml
//! ```
//!
//! Then try:
//! - `GET /habits?fields=name,target.value&sort=targetValue desc`
//! - `GET /habits?excludeFields=tags,frequency.timesPerPeriod`
//! - `GET /meta/habits/fields`

use habits::entities::habit::{Frequency, FrequencyType, HabitTag, HabitType, Target};
use habits::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(path)?,
        None => AppConfig::default_config(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let health = Tag::new("health", Some("Body and mind".to_string()));
    let learning = Tag::new("learning", None);

    let mut run = Habit::new(
        "Morning run",
        HabitType::Measurable,
        Frequency {
            frequency_type: FrequencyType::Daily,
            times_per_period: 1,
        },
    );
    run.target = Some(Target {
        value: 5.0,
        unit: "km".to_string(),
    });
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

    tracing::info!("seeded 2 habits and 2 tags");

    let addr = config.server.address();
    ServerBuilder::new()
        .with_config(config)
        .with_habit_service(InMemoryDataService::with_entities(vec![run, read]))
        .with_tag_service(InMemoryDataService::with_entities(vec![health, learning]))
        .serve(&addr)
        .await
}
