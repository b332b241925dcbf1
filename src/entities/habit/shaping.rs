//! Field mapping and sort aliases for habits

use super::dto::HabitDto;
use super::model::{Frequency, Habit, HabitTag, Milestone, Target};
use crate::registry::{MappingConfigurator, SortConfigurator};
use crate::shaping::mapping::MappingConfiguration;
use crate::sorting::options::SortOptions;
use serde::Serialize;
use serde_json::Value;

/// Serialize a value the same way the DTO does
pub(crate) fn json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

pub struct HabitMapping;

impl MappingConfigurator for HabitMapping {
    type Entity = Habit;
    type Dto = HabitDto;

    fn configure(config: &mut MappingConfiguration<Habit>) {
        config
            .map("id", |h: &Habit| h.id.to_string())
            .map("name", |h: &Habit| h.name.clone())
            .map("description", |h: &Habit| h.description.clone())
            .map("type", |h: &Habit| h.habit_type.as_str())
            .map_complex(
                "frequency",
                |h: &Habit| Some(&h.frequency),
                |f| {
                    f.map("type", |f: &Frequency| f.frequency_type.as_str())
                        .map("timesPerPeriod", |f: &Frequency| f.times_per_period);
                },
            )
            .map_complex(
                "target",
                |h: &Habit| h.target.as_ref(),
                |t| {
                    t.map("value", |t: &Target| t.value)
                        .map("unit", |t: &Target| t.unit.clone());
                },
            )
            .map("status", |h: &Habit| h.status.as_str())
            .map("isArchived", |h: &Habit| h.is_archived)
            .map("endDate", |h: &Habit| json(&h.end_date))
            .map_complex(
                "milestone",
                |h: &Habit| h.milestone.as_ref(),
                |m| {
                    m.map("target", |m: &Milestone| m.target)
                        .map("current", |m: &Milestone| m.current);
                },
            )
            .map_collection(
                "tags",
                |h: &Habit| h.tags.as_slice(),
                |t| {
                    t.map("id", |t: &HabitTag| t.id.to_string())
                        .map("name", |t: &HabitTag| t.name.clone());
                },
            )
            .map("createdAt", |h: &Habit| json(&h.created_at))
            .map("updatedAt", |h: &Habit| json(&h.updated_at))
            .map("lastCompletedAt", |h: &Habit| json(&h.last_completed_at));
    }
}

pub struct HabitSort;

impl SortConfigurator for HabitSort {
    type Entity = Habit;

    fn sort_options() -> SortOptions {
        SortOptions::new()
            .with_alias("id", "id")
            .with_alias("name", "name")
            .with_alias("type", "habit_type")
            .with_alias("frequency", "frequency.frequency_type")
            .with_alias("timesPerPeriod", "frequency.times_per_period")
            .with_alias("targetValue", "target.value")
            .with_alias("status", "status")
            .with_alias("isArchived", "is_archived")
            .with_alias("endDate", "end_date")
            .with_alias("milestone", "milestone.target")
            .with_alias("createdAt", "created_at")
            .with_alias("updatedAt", "updated_at")
            .with_alias("lastCompletedAt", "last_completed_at")
            .with_default("name asc")
    }
}
