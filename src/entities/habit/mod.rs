//! Habit entity: model, wire format, shaping configuration and payloads

pub mod dto;
pub mod model;
pub mod payload;
pub mod shaping;

pub use dto::{FrequencyDto, HabitDto, HabitTagDto, MilestoneDto, TargetDto};
pub use model::{
    Frequency, FrequencyType, Habit, HabitStatus, HabitTag, HabitType, Milestone, Target,
};
pub use payload::{
    CreateHabitRequest, FrequencyPayload, MilestonePayload, ReplaceTagsRequest, TargetPayload,
    UpdateHabitRequest,
};
pub use shaping::{HabitMapping, HabitSort};
