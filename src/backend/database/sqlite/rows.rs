use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Arguments, Row, SqlitePool};
use uuid::fmt::Hyphenated;
use uuid::Uuid;

use super::super::filter::SqlParam;
use super::super::query::ListStatement;
use super::super::rows::RecordRow;
use crate::backend::Page;
use crate::error::{AppError, AppResult};

// Ids are stored as hyphenated TEXT so they stay readable and comparable
// with the values bound from filters.

fn decode_error(column: &str, err: sqlx::Error) -> AppError {
    AppError::Database(format!("Failed to decode column '{}': {}", column, err))
}

impl RecordRow for SqliteRow {
    fn uuid(&self, column: &str) -> AppResult<Uuid> {
        self.try_get::<Hyphenated, _>(column)
            .map(Hyphenated::into_uuid)
            .map_err(|e| decode_error(column, e))
    }

    fn text(&self, column: &str) -> AppResult<String> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn opt_text(&self, column: &str) -> AppResult<Option<String>> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn flag(&self, column: &str) -> AppResult<bool> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn timestamp(&self, column: &str) -> AppResult<DateTime<Utc>> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }

    fn opt_timestamp(&self, column: &str) -> AppResult<Option<DateTime<Utc>>> {
        self.try_get(column).map_err(|e| decode_error(column, e))
    }
}

fn bind_error(err: sqlx::error::BoxDynError) -> AppError {
    AppError::Internal(format!("Failed to bind query parameter: {}", err))
}

pub fn arguments<'q>(params: &[SqlParam]) -> AppResult<SqliteArguments<'q>> {
    let mut args = SqliteArguments::default();
    for param in params {
        let added = match param {
            SqlParam::Text(text) => args.add(text.clone()),
            SqlParam::Bool(flag) => args.add(*flag),
            SqlParam::Uuid(id) => args.add(id.hyphenated()),
        };
        added.map_err(bind_error)?;
    }
    Ok(args)
}

/// Run a list statement and its count with the same filter parameters.
pub async fn fetch_page<T, F>(
    pool: &SqlitePool,
    statement: &ListStatement,
    map: F,
) -> AppResult<Page<T>>
where
    F: Fn(&SqliteRow) -> AppResult<T>,
{
    let total: i64 = sqlx::query_scalar_with(&statement.count_sql, arguments(&statement.params)?)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count records", e))?;

    let mut args = arguments(&statement.params)?;
    args.add(statement.limit).map_err(bind_error)?;
    args.add(statement.offset).map_err(bind_error)?;

    let rows = sqlx::query_with(&statement.select_sql, args)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::database("Failed to list records", e))?;

    let records = rows.iter().map(map).collect::<AppResult<Vec<T>>>()?;
    Ok((records, total))
}
