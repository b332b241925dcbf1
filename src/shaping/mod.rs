//! Dynamic field shaping
//!
//! Clients pick the fields they want with `fields=name,target.value` and drop
//! the ones they don't with `excludeFields=tags`. A request string goes
//! through four stages:
//!
//! 1. [`tokenizer`] splits it into distinct dot paths
//! 2. [`validator`] checks them against a [`Schema`] and groups them into a
//!    [`GroupedRequest`]
//! 3. [`compiler`] turns the request into an [`Accessor`] (for serialized
//!    DTOs) or a [`Projection`] (for queries, via a [`MappingConfiguration`])
//! 4. [`facade`] ties the stages together for include, exclude and combined
//!    requests

pub mod compiler;
pub mod error;
pub mod facade;
pub mod grouped;
pub mod mapping;
pub mod schema;
pub mod tokenizer;
pub mod validator;

pub use compiler::{Accessor, Projection, compile_accessor, compile_projection};
pub use error::{ContractViolation, FieldError, ShapeConflictError, ShapingError};
pub use facade::{
    exclude_fields, exclude_fields_query, include_fields, include_fields_query, plan,
    shape_fields, shape_fields_query, shape_object, try_exclude_fields, try_exclude_fields_query,
    try_include_fields, try_include_fields_query, try_shape_fields, try_shape_fields_query,
};
pub use grouped::{GroupedRequest, Selection};
pub use mapping::{Extractor, MappingConfiguration, MappingNode};
pub use schema::{FieldKind, Schema, SchemaField, ShapeSchema};
