use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::filter_impl::SqliteFilterConverter;
use super::rows::fetch_page;
use crate::backend::database::config::table_name;
use crate::backend::database::filter::fold_case;
use crate::backend::database::list_statement;
use crate::backend::database::rows::task_from_row;
use crate::backend::database::task_ops::{
    insert_task_sql, task_query, update_task_sql, PreparedTask, TaskStore,
};
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::Task;
use crate::parser::Pagination;

pub struct SqliteTaskStore {
    pool: SqlitePool,
    converter: SqliteFilterConverter,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            converter: SqliteFilterConverter::new(),
        }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn insert_task(&self, tenant_id: u32, task: &PreparedTask) -> AppResult<()> {
        sqlx::query(&insert_task_sql(&self.converter, tenant_id))
            .bind(task.task_id.hyphenated())
            .bind(task.event_id.hyphenated())
            .bind(task.user_id.hyphenated())
            .bind(&task.title)
            .bind(task.achieve)
            .bind(fold_case(&task.title))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create task", e))?;

        Ok(())
    }

    async fn select_task(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Task>> {
        let sql = task_query(tenant_id).by_key_sql(&self.converter, &["t.task_id"]);

        let row = sqlx::query(&sql)
            .bind(id.hyphenated())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find task", e))?;

        row.as_ref().map(task_from_row).transpose()
    }

    async fn select_tasks(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Task>> {
        let statement = list_statement(&self.converter, &task_query(tenant_id), None, filter, page)?;
        fetch_page(&self.pool, &statement, task_from_row).await
    }

    async fn update_task(
        &self,
        tenant_id: u32,
        id: Uuid,
        title: &str,
        achieve: bool,
    ) -> AppResult<bool> {
        let result = sqlx::query(&update_task_sql(&self.converter, tenant_id))
            .bind(title)
            .bind(achieve)
            .bind(id.hyphenated())
            .bind(fold_case(title))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update task", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE task_id = ?1",
            table_name("tasks", tenant_id)
        ))
        .bind(id.hyphenated())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to delete task", e))?;

        Ok(result.rows_affected() > 0)
    }
}
