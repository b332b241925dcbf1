//! Domain entities served by the API

pub mod habit;
pub mod tag;

pub use habit::{Habit, HabitDto, HabitMapping, HabitSort};
pub use tag::{Tag, TagDto, TagMapping, TagSort};

use crate::registry::RegistryBuilder;

/// Register the mappings and sort options of every entity
pub fn register_all(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register::<HabitMapping>()
        .register_sort::<HabitSort>()
        .register::<TagMapping>()
        .register_sort::<TagSort>()
}
