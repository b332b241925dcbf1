//! Declarative entity-to-DTO mapping configuration
//!
//! A [`MappingConfiguration`] records, for one entity type, how every output
//! field is extracted. It is built once at startup and then only read.
//!
//! ```rust,ignore
//! let mut config = MappingConfiguration::<Habit>::new();
//! config
//!     .map("name", |h: &Habit| h.name.clone())
//!     .map_complex("target", |h: &Habit| h.target.as_ref(), |t| {
//!         t.map("value", |t: &Target| t.value).map("unit", |t: &Target| t.unit.clone());
//!     })
//!     .map_collection("tags", |h: &Habit| h.tags.as_slice(), |t| {
//!         t.map("name", |t: &HabitTag| t.name.clone());
//!     });
//! ```

use super::grouped::GroupedRequest;
use super::schema::{FieldKind, Schema};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};

/// Extracts one output value from an entity
pub type Extractor<E> = Arc<dyn Fn(&E) -> Value + Send + Sync>;

pub(crate) type Presence<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

pub(crate) type ElementProjector<E> = Arc<dyn Fn(&E, &[String]) -> Value + Send + Sync>;

/// How a top-level output field is produced
pub enum MappingNode<E> {
    /// A single value
    Scalar(Extractor<E>),
    /// A nested object whose fields are read through a parent accessor
    Nested(NestedMapping<E>),
    /// A list built by shaping every element of an entity collection
    Collection(CollectionMapping<E>),
}

/// Fields of a nested object, rebased onto the owning entity
pub struct NestedMapping<E> {
    pub(crate) present: Presence<E>,
    pub(crate) fields: IndexMap<String, Extractor<E>>,
}

impl<E> NestedMapping<E> {
    /// Build the nested object limited to `names`
    ///
    /// Returns `null` when the parent object is absent, never a partially
    /// populated object.
    pub(crate) fn project<'n>(&self, entity: &E, names: impl IntoIterator<Item = &'n str>) -> Value {
        if !(self.present)(entity) {
            return Value::Null;
        }

        let mut object = Map::new();
        for name in names {
            if let Some(extract) = self.fields.get(name) {
                object.insert(name.to_string(), extract(entity));
            }
        }
        Value::Object(object)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Element shaping for a collection field
pub struct CollectionMapping<E> {
    pub(crate) element_schema: Schema,
    pub(crate) project: ElementProjector<E>,
}

impl<E> CollectionMapping<E> {
    /// Shape every element, keeping only `names`
    pub(crate) fn project(&self, entity: &E, names: &[String]) -> Value {
        (self.project)(entity, names)
    }

    pub fn element_schema(&self) -> &Schema {
        &self.element_schema
    }

    fn all_fields(&self) -> Vec<String> {
        self.element_schema.names().map(str::to_string).collect()
    }
}

impl<E: 'static> MappingNode<E> {
    /// The complete value of this field
    pub fn extract(&self, entity: &E) -> Value {
        match self {
            MappingNode::Scalar(extract) => extract(entity),
            MappingNode::Nested(nested) => nested.project(entity, nested.field_names()),
            MappingNode::Collection(collection) => {
                collection.project(entity, &collection.all_fields())
            }
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            MappingNode::Scalar(_) => FieldKind::Scalar,
            MappingNode::Nested(nested) => {
                let schema = nested
                    .field_names()
                    .fold(Schema::new(), |schema, name| schema.scalar(name));
                FieldKind::Optional(Box::new(FieldKind::Object(schema)))
            }
            MappingNode::Collection(collection) => {
                FieldKind::Collection(collection.element_schema.clone())
            }
        }
    }

    /// Collapse the node into a single whole-value extractor
    fn into_extractor(self) -> Extractor<E> {
        match self {
            MappingNode::Scalar(extract) => extract,
            node => {
                let extract: Extractor<E> = Arc::new(move |entity: &E| node.extract(entity));
                extract
            }
        }
    }
}

/// Mapping of output paths to extractors for one entity type
pub struct MappingConfiguration<E> {
    nodes: IndexMap<String, MappingNode<E>>,
    schema: OnceLock<Schema>,
    problems: Vec<String>,
}

impl<E> std::fmt::Debug for MappingConfiguration<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingConfiguration")
            .field("fields", &self.nodes.keys().collect::<Vec<_>>())
            .field("problems", &self.problems)
            .finish()
    }
}

impl<E: 'static> Default for MappingConfiguration<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> MappingConfiguration<E> {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            schema: OnceLock::new(),
            problems: Vec::new(),
        }
    }

    /// Register a scalar path
    ///
    /// A dotted path (`"target.unit"`) adds a field to an existing nested
    /// mapping and is read through that mapping's null guard. Registering a
    /// dotted path before its parent is a configuration problem.
    pub fn map<V, F>(&mut self, path: &str, extractor: F) -> &mut Self
    where
        V: Into<Value>,
        F: Fn(&E) -> V + Send + Sync + 'static,
    {
        let extractor: Extractor<E> = Arc::new(move |entity: &E| extractor(entity).into());

        match split_path(path) {
            Ok((top, None)) => self.insert(top, MappingNode::Scalar(extractor)),
            Ok((top, Some(nested))) => self.insert_nested(path, top, nested, extractor),
            Err(problem) => self.problems.push(problem),
        }
        self
    }

    /// Register a nested object
    ///
    /// The child configuration is written against the nested type `C`; its
    /// extractors are rebased onto `E` through `parent`, so `target.value`
    /// reads "target of the entity, then value of that target when present".
    pub fn map_complex<C, P, B>(&mut self, path: &str, parent: P, build: B) -> &mut Self
    where
        C: 'static,
        P: for<'a> Fn(&'a E) -> Option<&'a C> + Send + Sync + 'static,
        B: FnOnce(&mut MappingConfiguration<C>),
    {
        let Some(child) = self.child_config(path, build) else {
            return self;
        };

        let parent = Arc::new(parent);
        let present: Presence<E> = {
            let parent = Arc::clone(&parent);
            Arc::new(move |entity: &E| parent(entity).is_some())
        };

        let fields = child
            .nodes
            .into_iter()
            .map(|(name, node)| {
                let extract = node.into_extractor();
                let parent = Arc::clone(&parent);
                let rebased: Extractor<E> = Arc::new(move |entity: &E| {
                    parent(entity).map_or(Value::Null, |inner| extract(inner))
                });
                (name, rebased)
            })
            .collect();

        self.insert(path, MappingNode::Nested(NestedMapping { present, fields }));
        self
    }

    /// Register a collection
    ///
    /// Every element returned by `items` is shaped through the child
    /// configuration, producing a list of objects.
    pub fn map_collection<C, S, B>(&mut self, path: &str, items: S, build: B) -> &mut Self
    where
        C: 'static,
        S: for<'a> Fn(&'a E) -> &'a [C] + Send + Sync + 'static,
        B: FnOnce(&mut MappingConfiguration<C>),
    {
        let Some(child) = self.child_config(path, build) else {
            return self;
        };

        let element_schema = child.schema().clone();
        let element = Arc::new(child);
        let project: ElementProjector<E> = Arc::new(move |entity: &E, names: &[String]| {
            Value::Array(
                items(entity)
                    .iter()
                    .map(|item| element.project_fields(item, names))
                    .collect(),
            )
        });

        self.insert(
            path,
            MappingNode::Collection(CollectionMapping {
                element_schema,
                project,
            }),
        );
        self
    }

    /// Schema of the configured output, in declaration order
    pub fn schema(&self) -> &Schema {
        self.schema.get_or_init(|| {
            let mut schema = Schema::new();
            for (name, node) in &self.nodes {
                schema.push(name, node.kind());
            }
            schema
        })
    }

    /// Request for everything configured, in declaration order
    pub fn full_request(&self) -> GroupedRequest {
        self.schema().full_request()
    }

    /// Every configured dot path
    pub fn paths(&self) -> Vec<String> {
        self.schema().paths()
    }

    /// Nested field names per nested or collection field
    pub fn nested_groups(&self) -> IndexMap<String, Vec<String>> {
        self.schema()
            .fields()
            .iter()
            .filter_map(|field| {
                let nested = field.kind.nested_schema()?;
                Some((
                    field.name.clone(),
                    nested.names().map(str::to_string).collect(),
                ))
            })
            .collect()
    }

    pub fn node(&self, name: &str) -> Option<&MappingNode<E>> {
        self.nodes.get(name)
    }

    /// Problems found while building; empty for a usable configuration
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// Shape one entity keeping only the given top-level fields, whole
    pub(crate) fn project_fields(&self, entity: &E, names: &[String]) -> Value {
        let mut object = Map::new();
        for name in names {
            if let Some(node) = self.nodes.get(name) {
                object.insert(name.clone(), node.extract(entity));
            }
        }
        Value::Object(object)
    }

    fn child_config<C: 'static>(
        &mut self,
        path: &str,
        build: impl FnOnce(&mut MappingConfiguration<C>),
    ) -> Option<MappingConfiguration<C>> {
        match split_path(path) {
            Ok((_, None)) => {}
            Ok((_, Some(_))) => {
                self.problems.push(format!(
                    "'{path}' must be a top-level name to hold nested fields"
                ));
                return None;
            }
            Err(problem) => {
                self.problems.push(problem);
                return None;
            }
        }

        let mut child = MappingConfiguration::new();
        build(&mut child);

        self.problems.extend(
            child
                .problems
                .iter()
                .map(|problem| format!("in '{path}': {problem}")),
        );

        if child.nodes.is_empty() {
            self.problems
                .push(format!("'{path}' declares no nested fields"));
            return None;
        }

        Some(child)
    }

    fn insert(&mut self, name: &str, node: MappingNode<E>) {
        if self.nodes.keys().any(|key| key.eq_ignore_ascii_case(name)) {
            self.problems.push(format!("'{name}' is mapped more than once"));
            return;
        }
        self.nodes.insert(name.to_string(), node);
        self.schema = OnceLock::new();
    }

    fn insert_nested(&mut self, path: &str, top: &str, nested: &str, extractor: Extractor<E>) {
        let Some(MappingNode::Nested(parent)) = self.nodes.get_mut(top) else {
            self.problems.push(format!(
                "'{path}' requires '{top}' to be mapped as a nested object first"
            ));
            return;
        };

        if parent.fields.keys().any(|key| key.eq_ignore_ascii_case(nested)) {
            self.problems.push(format!("'{path}' is mapped more than once"));
            return;
        }

        parent.fields.insert(nested.to_string(), extractor);
        self.schema = OnceLock::new();
    }
}

/// Split a configured path into at most two non-empty segments
fn split_path(path: &str) -> Result<(&str, Option<&str>), String> {
    let segments: Vec<&str> = path.split('.').collect();

    match segments[..] {
        [top] if !top.is_empty() => Ok((top, None)),
        [top, nested] if !top.is_empty() && !nested.is_empty() => Ok((top, Some(nested))),
        [_, _, _, ..] => Err(format!("'{path}' is deeper than two segments")),
        _ => Err(format!("'{path}' is not a valid path")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Target {
        value: i32,
        unit: String,
    }

    struct Tag {
        name: String,
    }

    struct Habit {
        name: String,
        target: Option<Target>,
        tags: Vec<Tag>,
    }

    fn config() -> MappingConfiguration<Habit> {
        let mut config = MappingConfiguration::new();
        config
            .map("Name", |h: &Habit| h.name.clone())
            .map_complex(
                "Target",
                |h: &Habit| h.target.as_ref(),
                |t| {
                    t.map("Value", |t: &Target| t.value)
                        .map("Unit", |t: &Target| t.unit.clone());
                },
            )
            .map_collection(
                "Tags",
                |h: &Habit| h.tags.as_slice(),
                |t| {
                    t.map("Name", |t: &Tag| t.name.clone());
                },
            );
        config
    }

    fn run() -> Habit {
        Habit {
            name: "Run".to_string(),
            target: Some(Target {
                value: 5,
                unit: "km".to_string(),
            }),
            tags: vec![
                Tag {
                    name: "health".to_string(),
                },
                Tag {
                    name: "outdoor".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_configuration_has_no_problems() {
        assert!(config().problems().is_empty());
    }

    #[test]
    fn test_paths_follow_declaration_order() {
        assert_eq!(
            config().paths(),
            vec!["Name", "Target", "Target.Value", "Target.Unit", "Tags", "Tags.Name"]
        );
    }

    #[test]
    fn test_nested_groups() {
        let groups = config().nested_groups();
        assert_eq!(groups["Target"], vec!["Value", "Unit"]);
        assert_eq!(groups["Tags"], vec!["Name"]);
        assert!(!groups.contains_key("Name"));
    }

    #[test]
    fn test_whole_values() {
        let config = config();
        let habit = run();

        assert_eq!(config.node("Name").unwrap().extract(&habit), json!("Run"));
        assert_eq!(
            config.node("Target").unwrap().extract(&habit),
            json!({"Value": 5, "Unit": "km"})
        );
        assert_eq!(
            config.node("Tags").unwrap().extract(&habit),
            json!([{"Name": "health"}, {"Name": "outdoor"}])
        );
    }

    #[test]
    fn test_absent_nested_object_is_null() {
        let config = config();
        let mut habit = run();
        habit.target = None;

        assert_eq!(config.node("Target").unwrap().extract(&habit), Value::Null);
    }

    #[test]
    fn test_dotted_map_extends_nested_mapping() {
        let mut config = config();
        config.map("Target.Label", |h: &Habit| {
            h.target.as_ref().map(|t| format!("{} {}", t.value, t.unit))
        });

        assert!(config.problems().is_empty());
        assert_eq!(config.nested_groups()["Target"], vec!["Value", "Unit", "Label"]);
        assert_eq!(
            config.node("Target").unwrap().extract(&run()),
            json!({"Value": 5, "Unit": "km", "Label": "5 km"})
        );
    }

    #[test]
    fn test_dotted_map_without_parent_is_a_problem() {
        let mut config = MappingConfiguration::<Habit>::new();
        config.map("Target.Value", |h: &Habit| h.target.as_ref().map(|t| t.value));

        assert_eq!(config.problems().len(), 1);
        assert!(config.problems()[0].contains("'Target'"));
    }

    #[test]
    fn test_duplicate_path_is_a_problem() {
        let mut config = config();
        config.map("name", |h: &Habit| h.name.clone());
        assert_eq!(config.problems(), ["'name' is mapped more than once"]);
    }

    #[test]
    fn test_deep_path_is_a_problem() {
        let mut config = MappingConfiguration::<Habit>::new();
        config.map("a.b.c", |h: &Habit| h.name.clone());
        assert!(config.problems()[0].contains("deeper than two segments"));
    }

    #[test]
    fn test_empty_nested_mapping_is_a_problem() {
        let mut config = MappingConfiguration::<Habit>::new();
        config.map_complex("Target", |h: &Habit| h.target.as_ref(), |_| {});
        assert_eq!(config.problems(), ["'Target' declares no nested fields"]);
        assert!(config.node("Target").is_none());
    }
}
