//! Tag entity

pub mod dto;
pub mod model;
pub mod payload;
pub mod shaping;

pub use dto::TagDto;
pub use model::Tag;
pub use payload::{CreateTagRequest, UpdateTagRequest};
pub use shaping::{TagMapping, TagSort};
