use std::collections::HashMap;

use crate::error::{AppError, AppResult, FieldError};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;

/// Window over a list result, from `page[limit]` and `page[offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(0, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    pub fn from_query(params: &HashMap<String, String>) -> AppResult<Self> {
        let mut errors = Vec::new();

        let limit = parse_non_negative(params, "page[limit]", &mut errors).unwrap_or(DEFAULT_LIMIT);
        let offset = parse_non_negative(params, "page[offset]", &mut errors).unwrap_or(0);

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(Self::new(limit, offset))
    }
}

fn parse_non_negative(
    params: &HashMap<String, String>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let raw = params.get(key)?.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<i64>() {
        Ok(value) if value >= 0 => Some(value),
        _ => {
            errors.push(FieldError::new(
                key,
                format!("{} must be a non-negative integer", key),
            ));
            None
        }
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
    fn test_defaults() {
        let page = Pagination::from_query(&HashMap::new()).unwrap();
        assert_eq!(page, Pagination { limit: 10, offset: 0 });
    }

    #[test]
    fn test_explicit_values() {
        let page =
            Pagination::from_query(&query(&[("page[limit]", "25"), ("page[offset]", "50")])).unwrap();
        assert_eq!(page, Pagination { limit: 25, offset: 50 });
    }

    #[test]
    fn test_limit_is_capped() {
        let page = Pagination::from_query(&query(&[("page[limit]", "5000")])).unwrap();
        assert_eq!(page.limit, MAX_LIMIT);
    }

    #[test]
    fn test_invalid_values_are_reported_together() {
        let err = Pagination::from_query(&query(&[("page[limit]", "ten"), ("page[offset]", "-1")]))
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field_name.as_str()).collect();
                assert_eq!(fields, vec!["page[limit]", "page[offset]"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
