//! Field string tokenizer and dot-path grammar
//!
//! A field string is a comma-separated list of dot paths such as
//! `"name,target.value"`. Paths are limited to two segments.

use super::error::FieldError;
use std::collections::HashSet;

/// Split a field string into distinct, trimmed, non-empty tokens
///
/// Duplicates are detected case-insensitively and the first occurrence
/// wins, keeping its original casing and position.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Whether a field string requests nothing at all
pub fn is_blank(input: Option<&str>) -> bool {
    input.is_none_or(|s| s.trim().is_empty())
}

/// A parsed field path: a top-level name with an optional nested name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath<'a> {
    pub top: &'a str,
    pub nested: Option<&'a str>,
}

impl<'a> FieldPath<'a> {
    /// Parse a single token
    ///
    /// Returns `Ok(None)` for a token with no usable segment (e.g. `"."`).
    /// Empty segments are dropped, so `"target..value"` reads as
    /// `"target.value"`.
    pub fn parse(token: &'a str) -> Result<Option<Self>, FieldError> {
        let segments: Vec<&str> = token
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        match segments[..] {
            [] => Ok(None),
            [top] => Ok(Some(Self { top, nested: None })),
            [top, nested] => Ok(Some(Self {
                top,
                nested: Some(nested),
            })),
            _ => Err(FieldError::TooDeep {
                token: token.to_string(),
            }),
        }
    }
}
