//! Compilation of grouped requests into accessors and projections
//!
//! Two targets share one algorithm:
//! - [`Accessor`] reshapes an already serialized object (in-memory mode)
//! - [`Projection`] builds the shaped object straight from a stored entity
//!   using a [`MappingConfiguration`], so a query can evaluate it before any
//!   DTO is materialised
//!
//! Output keys follow the order of the grouped request. Both targets apply
//! the same null guard: a partially requested nested object whose parent is
//! absent comes out as `null`.

use super::error::ContractViolation;
use super::grouped::{GroupedRequest, Selection};
use super::mapping::{Extractor, MappingConfiguration, MappingNode};
use super::schema::Schema;
use serde_json::{Map, Value};
use std::sync::Arc;

// =============================================================================
// In-memory accessor
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum AccessStep {
    Whole {
        key: String,
    },
    Nested {
        key: String,
        fields: Vec<String>,
        collection: bool,
    },
}

/// Reshapes serialized objects according to a grouped request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    steps: Vec<AccessStep>,
}

impl Accessor {
    /// Build the shaped object from a serialized source object
    pub fn apply(&self, source: &Value) -> Value {
        let mut shaped = Map::new();

        for step in &self.steps {
            match step {
                AccessStep::Whole { key } => {
                    shaped.insert(key.clone(), source.get(key).cloned().unwrap_or(Value::Null));
                }
                AccessStep::Nested {
                    key,
                    fields,
                    collection,
                } => {
                    let value = match source.get(key) {
                        Some(Value::Array(items)) if *collection => Value::Array(
                            items.iter().map(|item| pick(item, fields)).collect(),
                        ),
                        Some(parent @ Value::Object(_)) if !*collection => pick(parent, fields),
                        _ => Value::Null,
                    };
                    shaped.insert(key.clone(), value);
                }
            }
        }

        Value::Object(shaped)
    }

    /// Top-level keys produced, in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| match step {
            AccessStep::Whole { key } | AccessStep::Nested { key, .. } => key.as_str(),
        })
    }
}

fn pick(object: &Value, fields: &[String]) -> Value {
    let Value::Object(source) = object else {
        return Value::Null;
    };

    let mut picked = Map::new();
    for field in fields {
        picked.insert(
            field.clone(),
            source.get(field).cloned().unwrap_or(Value::Null),
        );
    }
    Value::Object(picked)
}

/// Compile a grouped request against a reflected schema
pub fn compile_accessor(
    request: &GroupedRequest,
    schema: &Schema,
) -> Result<Accessor, ContractViolation> {
    let mut steps = Vec::with_capacity(request.len());

    for (top, selection) in request.iter() {
        let field = schema
            .fields()
            .iter()
            .find(|field| field.name == top)
            .ok_or_else(|| ContractViolation::new(top))?;

        let step = match selection {
            Selection::Whole => AccessStep::Whole {
                key: top.to_string(),
            },
            Selection::Partial(names) => {
                let nested = field
                    .kind
                    .nested_schema()
                    .ok_or_else(|| ContractViolation::new(top))?;
                if let Some(missing) = names.iter().find(|n| !nested.names().any(|k| k == *n)) {
                    return Err(ContractViolation::new(format!("{top}.{missing}")));
                }
                AccessStep::Nested {
                    key: top.to_string(),
                    fields: names.clone(),
                    collection: field.kind.is_collection(),
                }
            }
        };
        steps.push(step);
    }

    Ok(Accessor { steps })
}

// =============================================================================
// Query projection
// =============================================================================

enum ProjectionStep<E> {
    Value(Extractor<E>),
    Nested {
        present: Arc<dyn Fn(&E) -> bool + Send + Sync>,
        fields: Vec<(String, Extractor<E>)>,
    },
    Elements {
        project: Arc<dyn Fn(&E, &[String]) -> Value + Send + Sync>,
        fields: Vec<String>,
    },
}

/// A compiled shaping of entities of type `E`
///
/// Built per request from closures compiled once at configuration time;
/// evaluating it never touches the request string again.
pub struct Projection<E> {
    steps: Arc<Vec<(String, ProjectionStep<E>)>>,
}

impl<E> Clone for Projection<E> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<E> std::fmt::Debug for Projection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<E> Projection<E> {
    /// Shape one entity
    pub fn project(&self, entity: &E) -> Value {
        let mut shaped = Map::new();

        for (key, step) in self.steps.iter() {
            let value = match step {
                ProjectionStep::Value(extract) => extract(entity),
                ProjectionStep::Nested { present, fields } => {
                    if present(entity) {
                        let nested: Map<String, Value> = fields
                            .iter()
                            .map(|(name, extract)| (name.clone(), extract(entity)))
                            .collect();
                        Value::Object(nested)
                    } else {
                        Value::Null
                    }
                }
                ProjectionStep::Elements { project, fields } => project(entity, fields.as_slice()),
            };
            shaped.insert(key.clone(), value);
        }

        Value::Object(shaped)
    }

    /// Top-level keys produced, in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(key, _)| key.as_str())
    }
}

/// Compile a grouped request against a mapping configuration
pub fn compile_projection<E: 'static>(
    request: &GroupedRequest,
    config: &MappingConfiguration<E>,
) -> Result<Projection<E>, ContractViolation> {
    let mut steps = Vec::with_capacity(request.len());

    for (top, selection) in request.iter() {
        let node = config
            .node(top)
            .ok_or_else(|| ContractViolation::new(top))?;

        let step = match (node, selection) {
            (MappingNode::Scalar(extract), Selection::Whole) => {
                ProjectionStep::Value(Arc::clone(extract))
            }
            (MappingNode::Scalar(_), Selection::Partial(names)) => {
                let first = names.first().map(String::as_str).unwrap_or_default();
                return Err(ContractViolation::new(format!("{top}.{first}")));
            }
            (MappingNode::Nested(nested), selection) => {
                let names: Vec<&str> = match selection {
                    Selection::Whole => nested.field_names().collect(),
                    Selection::Partial(names) => names.iter().map(String::as_str).collect(),
                };
                let mut fields = Vec::with_capacity(names.len());
                for name in names {
                    let extract = nested
                        .fields
                        .get(name)
                        .ok_or_else(|| ContractViolation::new(format!("{top}.{name}")))?;
                    fields.push((name.to_string(), Arc::clone(extract)));
                }
                ProjectionStep::Nested {
                    present: Arc::clone(&nested.present),
                    fields,
                }
            }
            (MappingNode::Collection(collection), selection) => {
                let schema = collection.element_schema();
                let fields: Vec<String> = match selection {
                    Selection::Whole => schema.names().map(str::to_string).collect(),
                    Selection::Partial(names) => names.clone(),
                };
                if let Some(missing) = fields.iter().find(|f| !schema.names().any(|n| n == *f)) {
                    return Err(ContractViolation::new(format!("{top}.{missing}")));
                }
                ProjectionStep::Elements {
                    project: Arc::clone(&collection.project),
                    fields,
                }
            }
        };

        steps.push((top.to_string(), step));
    }

    Ok(Projection {
        steps: Arc::new(steps),
    })
}
