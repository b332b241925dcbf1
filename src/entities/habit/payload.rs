//! Request payloads for habit endpoints

use super::model::{
    Frequency, FrequencyType, Habit, HabitStatus, HabitTag, HabitType, Milestone, Target,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyPayload {
    #[serde(rename = "type")]
    pub frequency_type: FrequencyType,

    #[validate(range(min = 1, max = 100))]
    pub times_per_period: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TargetPayload {
    #[validate(range(exclusive_min = 0.0))]
    pub value: f64,

    #[validate(length(min = 1, max = 20))]
    pub unit: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MilestonePayload {
    #[validate(range(min = 1))]
    pub target: u32,

    #[serde(default)]
    pub current: u32,
}

/// Body of `POST /habits`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_target"))]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,

    #[serde(rename = "type")]
    pub habit_type: HabitType,

    #[validate(nested)]
    pub frequency: FrequencyPayload,

    #[validate(nested)]
    pub target: Option<TargetPayload>,

    pub end_date: Option<NaiveDate>,

    #[validate(nested)]
    pub milestone: Option<MilestonePayload>,

    /// Tags to attach, by id
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

fn validate_create_target(request: &CreateHabitRequest) -> Result<(), ValidationError> {
    check_target(request.habit_type, request.target.is_some())
}

/// A measurable habit needs a target, a binary one must not have one
fn check_target(habit_type: HabitType, has_target: bool) -> Result<(), ValidationError> {
    match (habit_type, has_target) {
        (HabitType::Measurable, false) => Err(ValidationError::new("target_required")
            .with_message("measurable habits need a target".into())),
        (HabitType::Binary, true) => Err(ValidationError::new("target_not_allowed")
            .with_message("binary habits cannot have a target".into())),
        _ => Ok(()),
    }
}

impl CreateHabitRequest {
    /// Build the habit, attaching already resolved tags
    pub fn into_habit(self, tags: Vec<HabitTag>) -> Habit {
        let mut habit = Habit::new(self.name, self.habit_type, self.frequency.into());
        habit.description = self.description;
        habit.target = self.target.map(Target::from);
        habit.end_date = self.end_date;
        habit.milestone = self.milestone.map(Milestone::from);
        habit.tags = tags;
        habit
    }
}

/// Body of `PUT /habits/{id}`
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub habit_type: Option<HabitType>,

    #[validate(nested)]
    pub frequency: Option<FrequencyPayload>,

    #[validate(nested)]
    pub target: Option<TargetPayload>,

    pub status: Option<HabitStatus>,

    pub is_archived: Option<bool>,

    pub end_date: Option<NaiveDate>,

    #[validate(nested)]
    pub milestone: Option<MilestonePayload>,

    pub last_completed_at: Option<DateTime<Utc>>,
}

impl UpdateHabitRequest {
    /// Apply the changes, checking the result is still consistent
    pub fn apply(self, habit: &mut Habit) -> Result<(), ValidationError> {
        let habit_type = self.habit_type.unwrap_or(habit.habit_type);
        let target = match self.target {
            Some(target) => Some(Target::from(target)),
            None if habit_type == HabitType::Binary => None,
            None => habit.target.clone(),
        };
        check_target(habit_type, target.is_some())?;

        if let Some(name) = self.name {
            habit.name = name;
        }
        if let Some(description) = self.description {
            habit.description = description;
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency.into();
        }
        if let Some(status) = self.status {
            habit.status = status;
        }
        if let Some(is_archived) = self.is_archived {
            habit.is_archived = is_archived;
        }
        if let Some(end_date) = self.end_date {
            habit.end_date = Some(end_date);
        }
        if let Some(milestone) = self.milestone {
            habit.milestone = Some(milestone.into());
        }
        if let Some(last_completed_at) = self.last_completed_at {
            habit.last_completed_at = Some(last_completed_at);
        }
        habit.habit_type = habit_type;
        habit.target = target;

        habit.touch();
        Ok(())
    }
}

/// Body of `PUT /habits/{id}/tags`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTagsRequest {
    #[validate(length(max = 50))]
    pub tag_ids: Vec<Uuid>,
}

impl From<FrequencyPayload> for Frequency {
    fn from(payload: FrequencyPayload) -> Self {
        Self {
            frequency_type: payload.frequency_type,
            times_per_period: payload.times_per_period,
        }
    }
}

impl From<TargetPayload> for Target {
    fn from(payload: TargetPayload) -> Self {
        Self {
            value: payload.value,
            unit: payload.unit,
        }
    }
}

impl From<MilestonePayload> for Milestone {
    fn from(payload: MilestonePayload) -> Self {
        Self {
            target: payload.target,
            current: payload.current,
        }
    }
}
