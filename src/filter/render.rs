use std::collections::BTreeMap;

use uuid::Uuid;

use super::rule::{EntityFilterSpec, FieldType, MatchKind, ResolvedField};
use crate::error::{AppError, AppResult, FieldError};
use crate::parser::{FilterEntry, FilterInput};

/// A coerced literal for an equality comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Uuid(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equals(FilterValue),
    /// Case-insensitive match against a `%`-wrapped pattern
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: &'static str,
    pub field_type: FieldType,
    pub comparison: Comparison,
}

/// Backend-agnostic predicates, grouped the way the input nested them.
/// All predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFilter {
    pub predicates: Vec<Predicate>,
    pub relations: BTreeMap<&'static str, Vec<Predicate>>,
}

impl RenderedFilter {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.relations.values().all(Vec::is_empty)
    }

    /// Total number of predicates across the entity and its relations.
    pub fn len(&self) -> usize {
        self.predicates.len() + self.relations.values().map(Vec::len).sum::<usize>()
    }
}

/// Translate `input` into predicates, rejecting anything `spec` does not whitelist.
///
/// Every offending field is reported in a single validation error, named
/// `relation.field` when it was nested.
pub fn render_filter(spec: &EntityFilterSpec, input: &FilterInput) -> AppResult<RenderedFilter> {
    let mut rendered = RenderedFilter::default();
    let mut errors = Vec::new();

    for (key, entry) in input.entries() {
        match entry {
            FilterEntry::Value(raw) => match spec.resolve(None, key) {
                Some(resolved) => match build_predicate(&resolved, raw) {
                    Ok(predicate) => rendered.predicates.push(predicate),
                    Err(message) => errors.push(FieldError::new(key, message)),
                },
                None => errors.push(unknown_field(key)),
            },
            FilterEntry::Relation(fields) => {
                for (field, raw) in fields {
                    let name = format!("{}.{}", key, field);
                    let Some(resolved) = spec.resolve(Some(key), field) else {
                        errors.push(unknown_field(&name));
                        continue;
                    };
                    // resolve() only matches scoped rules here
                    let Some(relation) = resolved.relation else {
                        errors.push(unknown_field(&name));
                        continue;
                    };
                    match build_predicate(&resolved, raw) {
                        Ok(predicate) => rendered
                            .relations
                            .entry(relation)
                            .or_default()
                            .push(predicate),
                        Err(message) => errors.push(FieldError::new(name, message)),
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        tracing::debug!(
            entity = spec.entity,
            predicates = rendered.len(),
            "rendered list filter"
        );
        Ok(rendered)
    } else {
        Err(AppError::Validation(errors))
    }
}

fn unknown_field(name: &str) -> FieldError {
    FieldError::new(name, format!("{} cannot be used as a filter", name))
}

fn build_predicate(resolved: &ResolvedField, raw: &str) -> Result<Predicate, String> {
    let field = resolved.field;
    let comparison = match resolved.kind {
        MatchKind::Contains => Comparison::Contains(format!("%{}%", raw)),
        MatchKind::Equals => Comparison::Equals(coerce(field.name, field.field_type, raw)?),
    };

    Ok(Predicate {
        field: field.name,
        field_type: field.field_type,
        comparison,
    })
}

fn coerce(name: &str, field_type: FieldType, raw: &str) -> Result<FilterValue, String> {
    match field_type {
        FieldType::Uuid => Uuid::parse_str(raw)
            .map(FilterValue::Uuid)
            .map_err(|_| format!("{} must be a UUID", name)),
        FieldType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(FilterValue::Bool(true)),
            "false" | "0" => Ok(FilterValue::Bool(false)),
            _ => Err(format!("{} must be a boolean value", name)),
        },
        FieldType::Enum(allowed) => {
            if allowed.contains(&raw) {
                Ok(FilterValue::Text(raw.to_string()))
            } else {
                Err(format!(
                    "{} must be one of the following values: {}",
                    name,
                    allowed.join(", ")
                ))
            }
        }
        FieldType::Text | FieldType::Timestamp => Ok(FilterValue::Text(raw.to_string())),
    }
}
