use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, PgPool, Row};
use uuid::Uuid;

use super::super::filter::SqlParam;
use super::super::query::ListStatement;
use super::super::rows::RecordRow;
use crate::backend::Page;
use crate::error::{AppError, AppResult};

fn column<'r, T>(row: &'r PgRow, name: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| AppError::Database(format!("Failed to decode column '{}': {}", name, e)))
}

impl RecordRow for PgRow {
    fn uuid(&self, name: &str) -> AppResult<Uuid> {
        column(self, name)
    }

    fn text(&self, name: &str) -> AppResult<String> {
        column(self, name)
    }

    fn opt_text(&self, name: &str) -> AppResult<Option<String>> {
        column(self, name)
    }

    fn flag(&self, name: &str) -> AppResult<bool> {
        column(self, name)
    }

    fn timestamp(&self, name: &str) -> AppResult<DateTime<Utc>> {
        column(self, name)
    }

    fn opt_timestamp(&self, name: &str) -> AppResult<Option<DateTime<Utc>>> {
        column(self, name)
    }
}

fn bind_error(err: sqlx::error::BoxDynError) -> AppError {
    AppError::Internal(format!("Failed to bind query parameter: {}", err))
}

pub fn arguments(params: &[SqlParam]) -> AppResult<PgArguments> {
    let mut args = PgArguments::default();
    for param in params {
        let added = match param {
            SqlParam::Text(text) => args.add(text.clone()),
            SqlParam::Bool(flag) => args.add(*flag),
            SqlParam::Uuid(id) => args.add(*id),
        };
        added.map_err(bind_error)?;
    }
    Ok(args)
}

/// Run a list statement and its count with the same filter parameters.
pub async fn fetch_page<T, F>(pool: &PgPool, statement: &ListStatement, map: F) -> AppResult<Page<T>>
where
    F: Fn(&PgRow) -> AppResult<T>,
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
