use async_trait::async_trait;
use uuid::Uuid;

use super::config::table_name;
use super::filter::{FilterConverter, FilterTarget};
use super::query::EntityQuery;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::{NewTask, Task, TaskChanges};
use crate::parser::Pagination;

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTask {
    pub task_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub achieve: bool,
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, tenant_id: u32, task: &PreparedTask) -> AppResult<()>;

    async fn select_task(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Task>>;

    async fn select_tasks(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Task>>;

    async fn update_task(
        &self,
        tenant_id: u32,
        id: Uuid,
        title: &str,
        achieve: bool,
    ) -> AppResult<bool>;

    async fn delete_task(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

pub fn task_query(tenant_id: u32) -> EntityQuery {
    EntityQuery {
        columns: "t.task_id, t.title, t.achieve, t.user_id, t.event_id, \
                  u.firstname AS user_firstname, u.lastname AS user_lastname, \
                  ev.title AS event_title, ev.description AS event_description",
        from: format!(
            "{} t JOIN {} u ON u.user_id = t.user_id JOIN {} ev ON ev.event_id = t.event_id",
            table_name("tasks", tenant_id),
            table_name("users", tenant_id),
            table_name("events", tenant_id),
        ),
        target: FilterTarget::new("t", &[("user", "u"), ("event", "ev")]),
        order_by: "t.task_id",
    }
}

pub fn insert_task_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "INSERT INTO {} (task_id, event_id, user_id, title, achieve, title_folded) \
         VALUES ({}, {}, {}, {}, {}, {})",
        table_name("tasks", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
        converter.placeholder(4),
        converter.placeholder(5),
        converter.placeholder(6),
    )
}

pub fn update_task_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "UPDATE {} SET title = {}, achieve = {}, title_folded = {} WHERE task_id = {}",
        table_name("tasks", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(4),
        converter.placeholder(3),
    )
}

pub struct UnifiedTaskOps<T: TaskStore> {
    store: T,
}

impl<T: TaskStore> UnifiedTaskOps<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    pub async fn create_task(&self, tenant_id: u32, task: &NewTask) -> AppResult<Task> {
        let prepared = PreparedTask {
            task_id: Uuid::new_v4(),
            event_id: task.event_id,
            user_id: task.user_id,
            title: task.title.clone(),
            achieve: false,
        };
        self.store.insert_task(tenant_id, &prepared).await?;

        self.store
            .select_task(tenant_id, prepared.task_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Task {} vanished after insert", prepared.task_id))
            })
    }

    pub async fn find_task_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Task>> {
        self.store.select_task(tenant_id, id).await
    }

    pub async fn find_tasks(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Task>> {
        self.store.select_tasks(tenant_id, filter, page).await
    }

    pub async fn update_task(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &TaskChanges,
    ) -> AppResult<Option<Task>> {
        let Some(current) = self.store.select_task(tenant_id, id).await? else {
            return Ok(None);
        };

        let updated = Task {
            title: changes.title.clone().unwrap_or(current.title),
            achieve: changes.achieve.unwrap_or(current.achieve),
            ..current
        };

        if self
            .store
            .update_task(tenant_id, id, &updated.title, updated.achieve)
            .await?
        {
            Ok(Some(updated))
        } else {
            Ok(None)
        }
    }

    pub async fn delete_task(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.store.delete_task(tenant_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_query_orders_by_id() {
        let query = task_query(1);
        assert_eq!(query.order_by, "t.task_id");
        assert!(query.columns.contains("ev.description AS event_description"));
    }
}
