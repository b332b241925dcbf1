//! Startup registry of mapping configurations and sort options
//!
//! Configurations are registered once through a [`RegistryBuilder`], checked,
//! and frozen into a [`ShapingRegistry`] that handlers share read-only.

use crate::core::entity::Entity;
use crate::core::error::ConfigError;
use crate::shaping::mapping::MappingConfiguration;
use crate::sorting::options::{SortConfig, SortOptions};
use crate::sorting::validator::validate;
use indexmap::IndexMap;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

/// Declares how an entity maps onto one of its DTOs
pub trait MappingConfigurator {
    type Entity: Entity;
    type Dto: 'static;

    fn configure(config: &mut MappingConfiguration<Self::Entity>);
}

/// Declares the sort aliases of an entity
pub trait SortConfigurator {
    type Entity: Entity;

    fn sort_options() -> SortOptions;
}

type MappingKey = (TypeId, TypeId);

/// Collects configurations before freezing them
#[derive(Default)]
pub struct RegistryBuilder {
    mappings: HashMap<MappingKey, Arc<dyn Any + Send + Sync>>,
    sorts: HashMap<TypeId, (&'static str, SortOptions)>,
    overrides: IndexMap<String, SortConfig>,
    errors: Vec<ConfigError>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mapping of entity `E` onto DTO `D`
    pub fn register_mapping<E, D, F>(mut self, configure: F) -> Self
    where
        E: Entity,
        D: 'static,
        F: FnOnce(&mut MappingConfiguration<E>),
    {
        let key = (TypeId::of::<E>(), TypeId::of::<D>());
        if self.mappings.contains_key(&key) {
            self.errors.push(ConfigError::DuplicateMapping {
                entity: E::resource_name(),
                dto: type_name::<D>(),
            });
            return self;
        }

        let mut config = MappingConfiguration::new();
        configure(&mut config);

        if !config.problems().is_empty() {
            self.errors.push(ConfigError::InvalidMapping {
                entity: E::resource_name(),
                dto: type_name::<D>(),
                problems: config.problems().to_vec(),
            });
            return self;
        }

        tracing::debug!(
            entity = E::resource_name(),
            dto = type_name::<D>(),
            paths = ?config.paths(),
            "registered mapping"
        );
        self.mappings.insert(key, Arc::new(config));
        self
    }

    /// Register a mapping declared by a configurator type
    pub fn register<C: MappingConfigurator>(self) -> Self {
        self.register_mapping::<C::Entity, C::Dto, _>(C::configure)
    }

    /// Register the sort options of entity `E`
    ///
    /// Registering again replaces the earlier options.
    pub fn register_sort_options<E: Entity>(mut self, options: SortOptions) -> Self {
        self.sorts
            .insert(TypeId::of::<E>(), (E::resource_name(), options));
        self
    }

    /// Register sort options declared by a configurator type
    pub fn register_sort<C: SortConfigurator>(self) -> Self {
        self.register_sort_options::<C::Entity>(C::sort_options())
    }

    /// Sort settings from configuration, keyed by resource name
    ///
    /// Aliases are added to (or replace) the registered ones and a configured
    /// default replaces the registered default.
    pub fn with_sort_overrides(mut self, overrides: &IndexMap<String, SortConfig>) -> Self {
        self.overrides.extend(
            overrides
                .iter()
                .map(|(resource, config)| (resource.clone(), config.clone())),
        );
        self
    }

    /// Freeze the registry, failing on the first configuration problem
    ///
    /// Default sorts, including overridden ones, must resolve against the
    /// aliases of their resource.
    pub fn build(self) -> Result<ShapingRegistry, ConfigError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let mut sorts: HashMap<TypeId, Arc<SortOptions>> = HashMap::new();
        let mut resources: HashMap<&'static str, TypeId> = HashMap::new();

        for (type_id, (resource, options)) in self.sorts {
            let options = match self.overrides.get(resource) {
                Some(config) => merge(options, config),
                None => options,
            };
            if let Err(error) = validate(None, &options) {
                return Err(ConfigError::InvalidDefaultSort {
                    resource,
                    default: options.default_sort().unwrap_or_default().to_string(),
                    reason: error.to_string(),
                });
            }
            resources.insert(resource, type_id);
            sorts.insert(type_id, Arc::new(options));
        }

        for resource in self.overrides.keys() {
            if !resources.contains_key(resource.as_str()) {
                tracing::warn!(%resource, "sort configuration for unregistered resource ignored");
            }
        }

        Ok(ShapingRegistry {
            mappings: self.mappings,
            sorts,
        })
    }
}

fn merge(options: SortOptions, config: &SortConfig) -> SortOptions {
    let options = config
        .aliases
        .iter()
        .fold(options, |options, (alias, path)| options.with_alias(alias, path));

    match &config.default {
        Some(default) => options.with_default(default),
        None => options,
    }
}

/// Frozen mapping configurations and sort options
///
/// Cheap to share behind an `Arc`; nothing is mutated after
/// [`RegistryBuilder::build`].
pub struct ShapingRegistry {
    mappings: HashMap<MappingKey, Arc<dyn Any + Send + Sync>>,
    sorts: HashMap<TypeId, Arc<SortOptions>>,
}

impl std::fmt::Debug for ShapingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapingRegistry")
            .field("mappings", &self.mappings.len())
            .field("sorts", &self.sorts.len())
            .finish()
    }
}

impl ShapingRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Mapping of entity `E` onto DTO `D`, if registered
    pub fn mapping<E: Entity, D: 'static>(&self) -> Option<Arc<MappingConfiguration<E>>> {
        let config = self.mappings.get(&(TypeId::of::<E>(), TypeId::of::<D>()))?;
        Arc::clone(config).downcast::<MappingConfiguration<E>>().ok()
    }

    /// Like [`mapping`](Self::mapping) but reports a missing registration
    pub fn require_mapping<E: Entity, D: 'static>(
        &self,
    ) -> Result<Arc<MappingConfiguration<E>>, ConfigError> {
        self.mapping::<E, D>().ok_or(ConfigError::MissingMapping {
            entity: E::resource_name(),
            dto: type_name::<D>(),
        })
    }

    /// Sort options of entity `E`; empty options when none were registered
    pub fn sort_options<E: Entity>(&self) -> Arc<SortOptions> {
        self.sorts
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    #[derive(Clone, Debug)]
    struct Note {
        id: Uuid,
        title: String,
    }

    struct NoteDto;
    struct NoteSummaryDto;

    impl Entity for Note {
        fn resource_name() -> &'static str {
            "notes"
        }

        fn resource_name_singular() -> &'static str {
            "note"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            DateTime::<Utc>::MIN_UTC
        }

        fn updated_at(&self) -> DateTime<Utc> {
            DateTime::<Utc>::MIN_UTC
        }

        fn field_value(&self, path: &str) -> Option<FieldValue> {
            match path {
                "title" => Some(self.title.as_str().into()),
                _ => None,
            }
        }
    }

    struct NoteMapping;

    impl MappingConfigurator for NoteMapping {
        type Entity = Note;
        type Dto = NoteDto;

        fn configure(config: &mut MappingConfiguration<Note>) {
            config
                .map("id", |n: &Note| n.id.to_string())
                .map("title", |n: &Note| n.title.clone());
        }
    }

    struct NoteSort;

    impl SortConfigurator for NoteSort {
        type Entity = Note;

        fn sort_options() -> SortOptions {
            SortOptions::new()
                .with_alias("title", "title")
                .with_default("title asc")
        }
    }

    #[test]
    fn test_mappings_are_keyed_by_type_pair() {
        let registry = ShapingRegistry::builder()
            .register::<NoteMapping>()
            .register_mapping::<Note, NoteSummaryDto, _>(|c| {
                c.map("title", |n: &Note| n.title.clone());
            })
            .build()
            .unwrap();

        let full = registry.mapping::<Note, NoteDto>().unwrap();
        assert_eq!(full.paths(), vec!["id", "title"]);

        let summary = registry.mapping::<Note, NoteSummaryDto>().unwrap();
        assert_eq!(summary.paths(), vec!["title"]);
    }

    #[test]
    fn test_missing_mapping() {
        let registry = ShapingRegistry::builder().build().unwrap();
        assert!(registry.mapping::<Note, NoteDto>().is_none());
        assert!(matches!(
            registry.require_mapping::<Note, NoteDto>(),
            Err(ConfigError::MissingMapping { entity: "notes", .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let result = ShapingRegistry::builder()
            .register::<NoteMapping>()
            .register::<NoteMapping>()
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateMapping { .. })));
    }

    #[test]
    fn test_invalid_mapping_fails() {
        let result = ShapingRegistry::builder()
            .register_mapping::<Note, NoteDto, _>(|c| {
                c.map("meta.title", |n: &Note| n.title.clone());
            })
            .build();

        let Err(ConfigError::InvalidMapping { problems, .. }) = result else {
            panic!("expected an invalid mapping error");
        };
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("meta.title"));
    }

    #[test]
    fn test_sort_options_and_overrides() {
        let mut overrides = IndexMap::new();
        overrides.insert(
            "notes".to_string(),
            SortConfig {
                default: Some("id desc".to_string()),
                aliases: IndexMap::from([("id".to_string(), "id".to_string())]),
            },
        );

        let registry = ShapingRegistry::builder()
            .register_sort::<NoteSort>()
            .with_sort_overrides(&overrides)
            .build()
            .unwrap();

        let options = registry.sort_options::<Note>();
        assert_eq!(options.default_sort(), Some("id desc"));
        assert_eq!(options.resolve("title"), Some("title"));
        assert_eq!(options.resolve("id"), Some("id"));
    }

    #[test]
    fn test_unknown_default_sort_fails_build() {
        let result = ShapingRegistry::builder()
            .register_sort_options::<Note>(
                SortOptions::new()
                    .with_alias("title", "title")
                    .with_default("bogus asc"),
            )
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDefaultSort { resource: "notes", .. })
        ));
    }

    #[test]
    fn test_overridden_default_sort_is_checked() {
        let mut overrides = IndexMap::new();
        overrides.insert(
            "notes".to_string(),
            SortConfig {
                default: Some("title sideways".to_string()),
                aliases: IndexMap::new(),
            },
        );

        let err = ShapingRegistry::builder()
            .register_sort::<NoteSort>()
            .with_sort_overrides(&overrides)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("title sideways"));
    }

    #[test]
    fn test_unregistered_sort_options_are_empty() {
        let registry = ShapingRegistry::builder().build().unwrap();
        let options = registry.sort_options::<Note>();
        assert_eq!(options.default_sort(), None);
        assert_eq!(options.aliases().count(), 0);
    }
}
