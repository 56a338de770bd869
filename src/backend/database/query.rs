//! SQL statements shared by both dialects.
//!
//! Only placeholders and `contains` expressions differ between PostgreSQL
//! and SQLite; they are supplied by the dialect's [`FilterConverter`].

use super::filter::{where_clause, FilterConverter, FilterTarget, SqlParam};
use crate::error::AppResult;
use crate::filter::RenderedFilter;
use crate::parser::Pagination;

/// The `SELECT` shape of one listed entity: columns, joined tables and the
/// aliases filters may address.
pub struct EntityQuery {
    pub columns: &'static str,
    pub from: String,
    pub target: FilterTarget<'static>,
    pub order_by: &'static str,
}

impl EntityQuery {
    /// `SELECT ... WHERE <key_columns[i]> = <placeholder i+1>`
    pub fn by_key_sql(&self, converter: &dyn FilterConverter, key_columns: &[&str]) -> String {
        let conditions: Vec<String> = key_columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = {}", column, converter.placeholder(i + 1)))
            .collect();

        format!(
            "SELECT {} FROM {}{}",
            self.columns,
            self.from,
            where_clause(&conditions)
        )
    }
}

/// A paginated list query plus the matching count query.
#[derive(Debug)]
pub struct ListStatement {
    pub select_sql: String,
    pub count_sql: String,
    /// Parameters shared by both statements
    pub params: Vec<SqlParam>,
    pub limit: i64,
    pub offset: i64,
}

/// Build the list statements for `query`, optionally scoped to rows whose
/// `scope.0` column equals `scope.1`.
pub fn list_statement(
    converter: &dyn FilterConverter,
    query: &EntityQuery,
    scope: Option<(&str, SqlParam)>,
    filter: &RenderedFilter,
    page: &Pagination,
) -> AppResult<ListStatement> {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some((column, value)) = scope {
        conditions.push(format!("{} = {}", column, converter.placeholder(1)));
        params.push(value);
    }

    let (filter_conditions, filter_params) =
        converter.to_conditions(filter, &query.target, params.len() + 1)?;
    conditions.extend(filter_conditions);
    params.extend(filter_params);

    let where_sql = where_clause(&conditions);

    let select_sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}{}",
        query.columns,
        query.from,
        where_sql,
        query.order_by,
        converter.pagination_clause(params.len() + 1)
    );
    let count_sql = format!("SELECT COUNT(*) FROM {}{}", query.from, where_sql);

    Ok(ListStatement {
        select_sql,
        count_sql,
        params,
        limit: page.limit,
        offset: page.offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::specs::GROUP_USER_FILTER;
    use crate::filter::{render_filter, FieldType};
    use crate::parser::FilterInput;
    use uuid::Uuid;

    struct Dollars;

    impl FilterConverter for Dollars {
        fn placeholder(&self, index: usize) -> String {
            format!("${}", index)
        }

        fn contains_expression(&self, column: &str, _: FieldType, placeholder: &str) -> String {
            format!("{} ILIKE {}", column, placeholder)
        }
    }

    fn members_query() -> EntityQuery {
        EntityQuery {
            columns: "gu.group_id, gu.user_id",
            from: "t1_group_users gu JOIN t1_users u ON u.user_id = gu.user_id".to_string(),
            target: FilterTarget::new("gu", &[("user", "u")]),
            order_by: "gu.join_date, gu.user_id",
        }
    }

    #[test]
    fn test_scoped_list_numbers_placeholders_after_scope() {
        let group_id = Uuid::new_v4();
        let input = FilterInput::new().with_relation_value("user", "firstname", "ann");
        let filter = render_filter(&GROUP_USER_FILTER, &input).unwrap();

        let statement = list_statement(
            &Dollars,
            &members_query(),
            Some(("gu.group_id", SqlParam::Uuid(group_id))),
            &filter,
            &Pagination::new(5, 10),
        )
        .unwrap();

        assert_eq!(
            statement.select_sql,
            "SELECT gu.group_id, gu.user_id FROM t1_group_users gu JOIN t1_users u ON u.user_id = gu.user_id \
             WHERE gu.group_id = $1 AND u.\"firstname_folded\" ILIKE $2 ORDER BY gu.join_date, gu.user_id LIMIT $3 OFFSET $4"
        );
        assert_eq!(
            statement.count_sql,
            "SELECT COUNT(*) FROM t1_group_users gu JOIN t1_users u ON u.user_id = gu.user_id \
             WHERE gu.group_id = $1 AND u.\"firstname_folded\" ILIKE $2"
        );
        assert_eq!(statement.params.len(), 2);
        assert_eq!((statement.limit, statement.offset), (5, 10));
    }

    #[test]
    fn test_unfiltered_list() {
        let statement = list_statement(
            &Dollars,
            &members_query(),
            None,
            &RenderedFilter::default(),
            &Pagination::default(),
        )
        .unwrap();

        assert!(!statement.select_sql.contains("WHERE"));
        assert!(statement.select_sql.ends_with("LIMIT $1 OFFSET $2"));
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_by_key_sql() {
        let sql = members_query().by_key_sql(&Dollars, &["gu.group_id", "gu.user_id"]);
        assert!(sql.ends_with("WHERE gu.group_id = $1 AND gu.user_id = $2"));
    }
}
