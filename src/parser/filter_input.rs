use std::collections::{BTreeMap, HashMap};

use crate::error::{AppError, AppResult, FieldError};

const FILTER_PREFIX: &str = "filter";

/// One `filter[...]` entry: a direct value or a relation's sub-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEntry {
    Value(String),
    Relation(BTreeMap<String, String>),
}

/// Caller-supplied filter object, keyed by field or relation name.
///
/// Built from bracketed query-string keys:
/// `filter[title]=party` and `filter[user][firstname]=ann`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    entries: BTreeMap<String, FilterEntry>,
}

impl FilterInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FilterEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add a direct field value.
    pub fn with_value(mut self, field: &str, value: &str) -> Self {
        self.entries
            .insert(field.to_string(), FilterEntry::Value(value.to_string()));
        self
    }

    /// Add a field value scoped to a relation.
    pub fn with_relation_value(mut self, relation: &str, field: &str, value: &str) -> Self {
        if let FilterEntry::Relation(inner) = self
            .entries
            .entry(relation.to_string())
            .or_insert_with(|| FilterEntry::Relation(BTreeMap::new()))
        {
            inner.insert(field.to_string(), value.to_string());
        }
        self
    }

    /// Collect every `filter[...]` key from decoded query parameters.
    ///
    /// Parameters outside the `filter` namespace are ignored. Empty values
    /// count as absent. Malformed keys, nesting beyond one relation, and keys
    /// used both as a field and as a relation are all reported together.
    pub fn from_query(params: &HashMap<String, String>) -> AppResult<Self> {
        let mut input = FilterInput::new();
        let mut errors = Vec::new();

        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        for key in keys {
            let Some(rest) = key.strip_prefix(FILTER_PREFIX) else {
                continue;
            };
            if !rest.starts_with('[') {
                continue;
            }
            let value = params[key].trim();

            let path = match parse_bracket_path(rest) {
                Some(path) => path,
                None => {
                    errors.push(FieldError::new(key.as_str(), format!("{} is not a valid filter key", key)));
                    continue;
                }
            };

            if value.is_empty() {
                continue;
            }

            match path.as_slice() {
                [field] => match input.entries.get(*field) {
                    Some(FilterEntry::Relation(_)) => errors.push(conflict_error(field)),
                    _ => {
                        input
                            .entries
                            .insert(field.to_string(), FilterEntry::Value(value.to_string()));
                    }
                },
                [relation, field] => match input.entries.get_mut(*relation) {
                    Some(FilterEntry::Value(_)) => errors.push(conflict_error(relation)),
                    Some(FilterEntry::Relation(inner)) => {
                        inner.insert(field.to_string(), value.to_string());
                    }
                    None => {
                        let mut inner = BTreeMap::new();
                        inner.insert(field.to_string(), value.to_string());
                        input
                            .entries
                            .insert(relation.to_string(), FilterEntry::Relation(inner));
                    }
                },
                _ => errors.push(FieldError::new(
                    path.join("."),
                    "filters can only be nested one relation deep",
                )),
            }
        }

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn conflict_error(name: &str) -> FieldError {
    FieldError::new(name, format!("{} cannot be both a field and a relation", name))
}

/// Split `[a][b]` into `["a", "b"]`. Returns `None` on any syntax error.
fn parse_bracket_path(mut rest: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();

    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let segment = inner[..close].trim();
        if segment.is_empty() || segment.contains('[') {
            return None;
        }
        segments.push(segment);
        rest = &inner[close + 1..];
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_direct_and_nested_keys() {
        let input = FilterInput::from_query(&query(&[
            ("filter[title]", "party"),
            ("filter[user][firstname]", "ann"),
            ("filter[user][user_id]", "abc"),
            ("page[limit]", "5"),
        ]))
        .unwrap();

        let expected = FilterInput::new()
            .with_value("title", "party")
            .with_relation_value("user", "firstname", "ann")
            .with_relation_value("user", "user_id", "abc");
        assert_eq!(input, expected);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let input =
            FilterInput::from_query(&query(&[("filter[title]", ""), ("filter[user][mail]", "  ")]))
                .unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn test_unrelated_parameters_are_ignored() {
        let input = FilterInput::from_query(&query(&[("filtered", "x"), ("sort", "title")])).unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let err = FilterInput::from_query(&query(&[("filter[event][group][title]", "x")]))
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field_name, "event.group.title");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_keys_are_rejected() {
        for key in ["filter[]", "filter[title", "filter[a]b", "filter[a[b]]"] {
            let result = FilterInput::from_query(&query(&[(key, "x")]));
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "{} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_field_and_relation_conflict() {
        let err = FilterInput::from_query(&query(&[
            ("filter[user]", "x"),
            ("filter[user][mail]", "y"),
        ]))
        .unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors[0].field_name, "user"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bracket_path() {
        assert_eq!(parse_bracket_path("[a]"), Some(vec!["a"]));
        assert_eq!(parse_bracket_path("[a][b]"), Some(vec!["a", "b"]));
        assert_eq!(parse_bracket_path(""), None);
        assert_eq!(parse_bracket_path("[a]]"), None);
    }
}
