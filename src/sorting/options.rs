//! Sort alias registry for one entity type

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Client-facing sort aliases and the default sort of an entity type
///
/// Aliases are matched case-insensitively. Built once at startup and only
/// read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    aliases: IndexMap<String, Alias>,
    default_sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Alias {
    name: String,
    path: String,
}

impl SortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a client alias to an internal field path
    pub fn with_alias(mut self, alias: &str, path: &str) -> Self {
        self.aliases.insert(
            alias.to_lowercase(),
            Alias {
                name: alias.to_string(),
                path: path.to_string(),
            },
        );
        self
    }

    /// Alias sort string used when a request carries none (e.g. `"name asc"`)
    pub fn with_default(mut self, sort: &str) -> Self {
        self.default_sort = Some(sort.to_string()).filter(|s| !s.trim().is_empty());
        self
    }

    /// Internal path for an alias
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases
            .get(&alias.to_lowercase())
            .map(|alias| alias.path.as_str())
    }

    pub fn default_sort(&self) -> Option<&str> {
        self.default_sort.as_deref()
    }

    /// Aliases as registered, in registration order
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .values()
            .map(|alias| (alias.name.as_str(), alias.path.as_str()))
    }
}

/// Serialized form of [`SortOptions`] used by configuration files
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortConfig {
    /// Default alias sort string
    #[serde(default)]
    pub default: Option<String>,

    /// Alias to internal path
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl From<&SortConfig> for SortOptions {
    fn from(config: &SortConfig) -> Self {
        let options = config
            .aliases
            .iter()
            .fold(SortOptions::new(), |options, (alias, path)| {
                options.with_alias(alias, path)
            });

        match &config.default {
            Some(default) => options.with_default(default),
            None => options,
        }
    }
}
