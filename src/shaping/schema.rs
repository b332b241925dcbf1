//! Schema descriptions for shaped types
//!
//! A [`Schema`] lists the fields of an output type in declaration order.
//! Nested objects and collections carry their own schema, and optional
//! values are wrapped explicitly so the validator can see through them.

use super::grouped::GroupedRequest;

/// The shape of a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A value returned as-is
    Scalar,
    /// A nested object with its own fields
    Object(Schema),
    /// A list whose elements share one schema
    Collection(Schema),
    /// A value that may be absent
    Optional(Box<FieldKind>),
}

impl FieldKind {
    /// The kind with every optional wrapper removed
    pub fn unwrapped(&self) -> &FieldKind {
        let mut kind = self;
        while let FieldKind::Optional(inner) = kind {
            kind = inner;
        }
        kind
    }

    /// The schema reachable one level down, if any
    pub fn nested_schema(&self) -> Option<&Schema> {
        match self.unwrapped() {
            FieldKind::Object(schema) | FieldKind::Collection(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.unwrapped(), FieldKind::Collection(_))
    }
}

/// A named field inside a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

/// Ordered field list of a shaped type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar field
    pub fn scalar(self, name: &str) -> Self {
        self.with(name, FieldKind::Scalar)
    }

    /// Add a nested object field that is always present
    pub fn object(self, name: &str, schema: Schema) -> Self {
        self.with(name, FieldKind::Object(schema))
    }

    /// Add a nested object field that may be null
    pub fn optional_object(self, name: &str, schema: Schema) -> Self {
        self.with(name, FieldKind::Optional(Box::new(FieldKind::Object(schema))))
    }

    /// Add a collection field
    pub fn collection(self, name: &str, schema: Schema) -> Self {
        self.with(name, FieldKind::Collection(schema))
    }

    /// Add a field of any kind
    pub fn with(mut self, name: &str, kind: FieldKind) -> Self {
        self.push(name, kind);
        self
    }

    pub(crate) fn push(&mut self, name: &str, kind: FieldKind) {
        self.fields.push(SchemaField {
            name: name.to_string(),
            kind,
        });
    }

    /// Look a field up by name, ignoring case
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A request for every top-level field, in declaration order
    pub fn full_request(&self) -> GroupedRequest {
        let mut request = GroupedRequest::new();
        for name in self.names() {
            request.request_whole(name);
        }
        request
    }

    /// Every addressable dot path: top-level names followed by their
    /// nested names
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for field in &self.fields {
            paths.push(field.name.clone());
            if let Some(nested) = field.kind.nested_schema() {
                paths.extend(nested.names().map(|sub| format!("{}.{}", field.name, sub)));
            }
        }
        paths
    }
}

/// Types that describe their own output schema
///
/// Implemented by DTOs that are shaped in memory after serialization.
/// Field names must match the serialized names.
pub trait ShapeSchema {
    fn schema() -> &'static Schema;
}
