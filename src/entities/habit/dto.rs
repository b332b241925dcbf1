//! Wire representation of habits

use super::model::{
    Frequency, FrequencyType, Habit, HabitStatus, HabitTag, HabitType, Milestone, Target,
};
use crate::shaping::schema::{Schema, ShapeSchema};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyDto {
    #[serde(rename = "type")]
    pub frequency_type: FrequencyType,
    pub times_per_period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDto {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDto {
    pub target: u32,
    pub current: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitTagDto {
    pub id: Uuid,
    pub name: String,
}

/// A habit as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    pub frequency: FrequencyDto,
    pub target: Option<TargetDto>,
    pub status: HabitStatus,
    pub is_archived: bool,
    pub end_date: Option<NaiveDate>,
    pub milestone: Option<MilestoneDto>,
    pub tags: Vec<HabitTagDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl From<&Frequency> for FrequencyDto {
    fn from(frequency: &Frequency) -> Self {
        Self {
            frequency_type: frequency.frequency_type,
            times_per_period: frequency.times_per_period,
        }
    }
}

impl From<&Target> for TargetDto {
    fn from(target: &Target) -> Self {
        Self {
            value: target.value,
            unit: target.unit.clone(),
        }
    }
}

impl From<&Milestone> for MilestoneDto {
    fn from(milestone: &Milestone) -> Self {
        Self {
            target: milestone.target,
            current: milestone.current,
        }
    }
}

impl From<&HabitTag> for HabitTagDto {
    fn from(tag: &HabitTag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

impl From<&Habit> for HabitDto {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id,
            name: habit.name.clone(),
            description: habit.description.clone(),
            habit_type: habit.habit_type,
            frequency: FrequencyDto::from(&habit.frequency),
            target: habit.target.as_ref().map(TargetDto::from),
            status: habit.status,
            is_archived: habit.is_archived,
            end_date: habit.end_date,
            milestone: habit.milestone.as_ref().map(MilestoneDto::from),
            tags: habit.tags.iter().map(HabitTagDto::from).collect(),
            created_at: habit.created_at,
            updated_at: habit.updated_at,
            last_completed_at: habit.last_completed_at,
        }
    }
}

impl ShapeSchema for HabitDto {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .scalar("id")
                .scalar("name")
                .scalar("description")
                .scalar("type")
                .object(
                    "frequency",
                    Schema::new().scalar("type").scalar("timesPerPeriod"),
                )
                .optional_object("target", Schema::new().scalar("value").scalar("unit"))
                .scalar("status")
                .scalar("isArchived")
                .scalar("endDate")
                .optional_object(
                    "milestone",
                    Schema::new().scalar("target").scalar("current"),
                )
                .collection("tags", Schema::new().scalar("id").scalar("name"))
                .scalar("createdAt")
                .scalar("updatedAt")
                .scalar("lastCompletedAt")
        })
    }
}
