use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::filter::{Comparison, FieldType, FilterValue, Predicate, RenderedFilter};

/// A value bound to a numbered placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Bool(bool),
    Uuid(Uuid),
}

impl From<&FilterValue> for SqlParam {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Text(text) => SqlParam::Text(text.clone()),
            FilterValue::Bool(flag) => SqlParam::Bool(*flag),
            FilterValue::Uuid(id) => SqlParam::Uuid(*id),
        }
    }
}

/// Table aliases a rendered filter is converted against: the listed entity
/// and one alias per joined relation.
#[derive(Debug, Clone, Copy)]
pub struct FilterTarget<'a> {
    pub alias: &'a str,
    pub relations: &'a [(&'static str, &'a str)],
}

impl<'a> FilterTarget<'a> {
    pub const fn new(alias: &'a str, relations: &'a [(&'static str, &'a str)]) -> Self {
        Self { alias, relations }
    }

    fn relation_alias(&self, relation: &str) -> AppResult<&'a str> {
        self.relations
            .iter()
            .find(|(name, _)| *name == relation)
            .map(|(_, alias)| *alias)
            .ok_or_else(|| {
                AppError::Internal(format!("No join available for relation '{}'", relation))
            })
    }
}

/// Qualified, quoted column reference. Field names only ever come from
/// the filter whitelist.
pub fn column(alias: &str, field: &str) -> String {
    format!("{}.\"{}\"", alias, field)
}

/// Companion column holding the lowercased copy of a text field. Substring
/// filters on text compare against it, since neither SQLite's `LOWER()` nor
/// a `C`-collated PostgreSQL folds letters outside ASCII.
pub fn folded_column(alias: &str, field: &str) -> String {
    format!("{}.\"{}_folded\"", alias, field)
}

/// Lowercase `value` for storage in, or comparison against, a folded column.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// `" WHERE a AND b"`, or nothing at all when there are no conditions.
pub fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

/// Converts rendered filters to dialect-specific SQL conditions.
pub trait FilterConverter: Send + Sync {
    /// Placeholder for the 1-based parameter `index` (`$1` or `?1`)
    fn placeholder(&self, index: usize) -> String;

    /// Substring match of `column` against a bound pattern. Text fields
    /// arrive here as their folded column with an already lowercased pattern.
    fn contains_expression(
        &self,
        column: &str,
        field_type: FieldType,
        placeholder: &str,
    ) -> String;

    /// Convert `filter` into AND-able conditions whose placeholders start at
    /// `first_param`, together with the values to bind in order.
    fn to_conditions(
        &self,
        filter: &RenderedFilter,
        target: &FilterTarget<'_>,
        first_param: usize,
    ) -> AppResult<(Vec<String>, Vec<SqlParam>)> {
        let mut conditions = Vec::with_capacity(filter.len());
        let mut params = Vec::with_capacity(filter.len());

        for predicate in &filter.predicates {
            let placeholder = self.placeholder(first_param + params.len());
            conditions.push(self.predicate_sql(target.alias, predicate, &placeholder));
            params.push(predicate_param(predicate));
        }

        for (relation, predicates) in &filter.relations {
            let alias = target.relation_alias(relation)?;
            for predicate in predicates {
                let placeholder = self.placeholder(first_param + params.len());
                conditions.push(self.predicate_sql(alias, predicate, &placeholder));
                params.push(predicate_param(predicate));
            }
        }

        Ok((conditions, params))
    }

    fn predicate_sql(&self, alias: &str, predicate: &Predicate, placeholder: &str) -> String {
        match (&predicate.comparison, predicate.field_type) {
            (Comparison::Equals(_), _) => {
                format!("{} = {}", column(alias, predicate.field), placeholder)
            }
            (Comparison::Contains(_), FieldType::Text) => self.contains_expression(
                &folded_column(alias, predicate.field),
                FieldType::Text,
                placeholder,
            ),
            (Comparison::Contains(_), field_type) => {
                self.contains_expression(&column(alias, predicate.field), field_type, placeholder)
            }
        }
    }

    /// `LIMIT`/`OFFSET` clause using the two placeholders after `next_param - 1`
    fn pagination_clause(&self, next_param: usize) -> String {
        format!(
            " LIMIT {} OFFSET {}",
            self.placeholder(next_param),
            self.placeholder(next_param + 1)
        )
    }
}

fn predicate_param(predicate: &Predicate) -> SqlParam {
    match &predicate.comparison {
        Comparison::Equals(value) => SqlParam::from(value),
        Comparison::Contains(pattern) if predicate.field_type == FieldType::Text => {
            SqlParam::Text(fold_case(pattern))
        }
        Comparison::Contains(pattern) => SqlParam::Text(pattern.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::specs::{EVENT_FILTER, USER_FILTER};
    use crate::filter::render_filter;
    use crate::parser::FilterInput;

    struct QuestionMarks;

    impl FilterConverter for QuestionMarks {
        fn placeholder(&self, index: usize) -> String {
            format!("?{}", index)
        }

        fn contains_expression(&self, column: &str, _: FieldType, placeholder: &str) -> String {
            format!("{} LIKE {}", column, placeholder)
        }
    }

    const EVENT_TARGET: FilterTarget<'static> =
        FilterTarget::new("e", &[("creator_user", "cu"), ("group", "grp")]);

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let (conditions, params) = QuestionMarks
            .to_conditions(&RenderedFilter::default(), &EVENT_TARGET, 1)
            .unwrap();

        assert!(conditions.is_empty());
        assert!(params.is_empty());
        assert_eq!(where_clause(&conditions), "");
    }

    #[test]
    fn test_direct_and_relation_predicates() {
        let input = FilterInput::new()
            .with_value("title", "bbq")
            .with_relation_value("group", "title", "Climbing");
        let rendered = render_filter(&EVENT_FILTER, &input).unwrap();

        let (conditions, params) = QuestionMarks
            .to_conditions(&rendered, &EVENT_TARGET, 2)
            .unwrap();

        assert_eq!(
            conditions,
            vec![
                "e.\"title_folded\" LIKE ?2".to_string(),
                "grp.\"title_folded\" LIKE ?3".to_string()
            ]
        );
        assert_eq!(
            params,
            vec![
                SqlParam::Text("%bbq%".to_string()),
                SqlParam::Text("%climbing%".to_string())
            ]
        );
        assert_eq!(
            where_clause(&conditions),
            " WHERE e.\"title_folded\" LIKE ?2 AND grp.\"title_folded\" LIKE ?3"
        );
    }

    #[test]
    fn test_equality_binds_typed_values() {
        let id = Uuid::new_v4();
        let input = FilterInput::new()
            .with_value("user_id", &id.to_string())
            .with_value("active", "true");
        let rendered = render_filter(&USER_FILTER, &input).unwrap();

        let (conditions, params) = QuestionMarks
            .to_conditions(&rendered, &FilterTarget::new("u", &[]), 1)
            .unwrap();

        assert_eq!(conditions.len(), 2);
        assert!(params.contains(&SqlParam::Uuid(id)));
        assert!(params.contains(&SqlParam::Bool(true)));
    }

    #[test]
    fn test_missing_join_is_an_internal_error() {
        let input = FilterInput::new().with_relation_value("group", "title", "x");
        let rendered = render_filter(&EVENT_FILTER, &input).unwrap();

        let result = QuestionMarks.to_conditions(&rendered, &FilterTarget::new("e", &[]), 1);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_text_contains_folds_non_ascii_letters() {
        let input = FilterInput::new()
            .with_value("firstname", "ÉLODIE")
            .with_value("lastname", "René");
        let rendered = render_filter(&USER_FILTER, &input).unwrap();

        let (conditions, params) = QuestionMarks
            .to_conditions(&rendered, &FilterTarget::new("u", &[]), 1)
            .unwrap();

        assert_eq!(
            conditions,
            vec![
                "u.\"firstname_folded\" LIKE ?1".to_string(),
                "u.\"lastname_folded\" LIKE ?2".to_string()
            ]
        );
        assert_eq!(
            params,
            vec![
                SqlParam::Text("%élodie%".to_string()),
                SqlParam::Text("%rené%".to_string())
            ]
        );
    }

    #[test]
    fn test_timestamp_contains_uses_the_raw_column() {
        let input = FilterInput::new().with_value("event_date", "2026-07");
        let rendered = render_filter(&EVENT_FILTER, &input).unwrap();

        let (conditions, params) = QuestionMarks
            .to_conditions(&rendered, &EVENT_TARGET, 1)
            .unwrap();

        assert_eq!(conditions, vec!["e.\"event_date\" LIKE ?1".to_string()]);
        assert_eq!(params, vec![SqlParam::Text("%2026-07%".to_string())]);
    }

    #[test]
    fn test_pagination_clause() {
        assert_eq!(QuestionMarks.pagination_clause(3), " LIMIT ?3 OFFSET ?4");
    }
}
