use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::filter_impl::PostgresFilterConverter;
use super::rows::fetch_page;
use crate::backend::database::config::table_name;
use crate::backend::database::event_ops::{
    event_query, insert_event_sql, update_event_sql, EventStore, PreparedEvent,
    PreparedEventUpdate,
};
use crate::backend::database::filter::fold_case;
use crate::backend::database::list_statement;
use crate::backend::database::rows::event_from_row;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::Event;
use crate::parser::Pagination;

pub struct PostgresEventStore {
    pool: PgPool,
    converter: PostgresFilterConverter,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            converter: PostgresFilterConverter::new(),
        }
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn insert_event(&self, tenant_id: u32, event: &PreparedEvent) -> AppResult<()> {
        sqlx::query(&insert_event_sql(&self.converter, tenant_id))
            .bind(event.event_id)
            .bind(event.group_id)
            .bind(event.creator_user_id)
            .bind(event.event_type.as_str())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.creation_date)
            .bind(event.event_date)
            .bind(fold_case(&event.title))
            .bind(fold_case(&event.description))
            .bind(fold_case(&event.location))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create event", e))?;

        Ok(())
    }

    async fn select_event(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Event>> {
        let sql = event_query(tenant_id).by_key_sql(&self.converter, &["e.event_id"]);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find event", e))?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn select_events(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Event>> {
        let statement =
            list_statement(&self.converter, &event_query(tenant_id), None, filter, page)?;
        fetch_page(&self.pool, &statement, event_from_row).await
    }

    async fn update_event(
        &self,
        tenant_id: u32,
        id: Uuid,
        update: &PreparedEventUpdate,
    ) -> AppResult<bool> {
        let result = sqlx::query(&update_event_sql(&self.converter, tenant_id))
            .bind(update.event_type.as_str())
            .bind(&update.title)
            .bind(&update.description)
            .bind(&update.location)
            .bind(update.event_date)
            .bind(id)
            .bind(fold_case(&update.title))
            .bind(fold_case(&update.description))
            .bind(fold_case(&update.location))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update event", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_event(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        // Tasks and comments follow through ON DELETE CASCADE
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE event_id = $1",
            table_name("events", tenant_id)
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to delete event", e))?;

        Ok(result.rows_affected() > 0)
    }
}
