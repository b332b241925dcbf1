//! Habit entity model

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use crate::entities::tag::Tag;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a habit is simply done or measured against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    Binary,
    Measurable,
}

impl HabitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Binary => "binary",
            HabitType::Measurable => "measurable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    Daily,
    Weekly,
    Monthly,
}

impl FrequencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyType::Daily => "daily",
            FrequencyType::Weekly => "weekly",
            FrequencyType::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Ongoing,
    Completed,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Ongoing => "ongoing",
            HabitStatus::Completed => "completed",
        }
    }
}

/// How often a habit should be done
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    pub frequency_type: FrequencyType,
    pub times_per_period: u32,
}

/// Amount to reach per period for measurable habits
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub value: f64,
    pub unit: String,
}

/// Number of completions to reach, and how many are done
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub target: u32,
    pub current: u32,
}

/// A tag as attached to a habit
#[derive(Debug, Clone, PartialEq)]
pub struct HabitTag {
    pub id: Uuid,
    pub name: String,
}

impl From<&Tag> for HabitTag {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    pub target: Option<Target>,
    pub status: HabitStatus,
    pub is_archived: bool,
    pub end_date: Option<NaiveDate>,
    pub milestone: Option<Milestone>,
    pub tags: Vec<HabitTag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// A new ongoing habit without target, milestone or tags
    pub fn new(name: impl Into<String>, habit_type: HabitType, frequency: Frequency) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            habit_type,
            frequency,
            target: None,
            status: HabitStatus::Ongoing,
            is_archived: false,
            end_date: None,
            milestone: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            last_completed_at: None,
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Drop a tag from the habit, returning whether it was attached
    pub fn detach_tag(&mut self, tag_id: &Uuid) -> bool {
        let before = self.tags.len();
        self.tags.retain(|tag| &tag.id != tag_id);
        self.tags.len() != before
    }
}

impl Entity for Habit {
    fn resource_name() -> &'static str {
        "habits"
    }

    fn resource_name_singular() -> &'static str {
        "habit"
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
            "description" => self.description.as_str().into(),
            "habit_type" => self.habit_type.as_str().into(),
            "frequency.frequency_type" => self.frequency.frequency_type.as_str().into(),
            "frequency.times_per_period" => self.frequency.times_per_period.into(),
            "target.value" => self.target.as_ref().map(|t| t.value).into(),
            "target.unit" => self.target.as_ref().map(|t| t.unit.as_str()).into(),
            "status" => self.status.as_str().into(),
            "is_archived" => self.is_archived.into(),
            "end_date" => self.end_date.into(),
            "milestone.target" => self.milestone.as_ref().map(|m| m.target).into(),
            "milestone.current" => self.milestone.as_ref().map(|m| m.current).into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            "last_completed_at" => self.last_completed_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}
