//! Validated field requests grouped by top-level field

use indexmap::IndexMap;

/// What is requested from one top-level field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The whole field, as configured
    Whole,
    /// Only these nested fields, in request order
    Partial(Vec<String>),
}

impl Selection {
    pub fn is_whole(&self) -> bool {
        matches!(self, Selection::Whole)
    }
}

/// Top-level field name to selection, in request order
///
/// Names are the canonical schema names, never the raw tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedRequest {
    groups: IndexMap<String, Selection>,
}

impl GroupedRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a whole field
    ///
    /// A whole request replaces any partial one already recorded for the
    /// same field, keeping the field's original position.
    pub fn request_whole(&mut self, top: &str) {
        self.groups.insert(top.to_string(), Selection::Whole);
    }

    /// Request one nested field under `top`
    ///
    /// Ignored when the whole field is already requested. Duplicate nested
    /// names are recorded once.
    pub fn request_nested(&mut self, top: &str, nested: &str) {
        let selection = self
            .groups
            .entry(top.to_string())
            .or_insert_with(|| Selection::Partial(Vec::new()));

        let Selection::Partial(names) = selection else {
            return;
        };
        if !names.iter().any(|n| n.eq_ignore_ascii_case(nested)) {
            names.push(nested.to_string());
        }
    }

    /// Insert a pre-computed selection
    pub(crate) fn insert(&mut self, top: &str, selection: Selection) {
        self.groups.insert(top.to_string(), selection);
    }

    pub fn get(&self, top: &str) -> Option<&Selection> {
        self.groups.get(top)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selection)> {
        self.groups.iter().map(|(name, sel)| (name.as_str(), sel))
    }

    /// Top-level names in request order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
