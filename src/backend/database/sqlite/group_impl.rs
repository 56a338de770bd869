use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::filter_impl::SqliteFilterConverter;
use super::rows::fetch_page;
use crate::backend::database::config::table_name;
use crate::backend::database::filter::fold_case;
use crate::backend::database::group_ops::{group_query, insert_group_sql, update_group_sql, GroupStore};
use crate::backend::database::list_statement;
use crate::backend::database::rows::group_from_row;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::Group;
use crate::parser::Pagination;

pub struct SqliteGroupStore {
    pool: SqlitePool,
    converter: SqliteFilterConverter,
}

impl SqliteGroupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            converter: SqliteFilterConverter::new(),
        }
    }
}

#[async_trait]
impl GroupStore for SqliteGroupStore {
    async fn insert_group(&self, tenant_id: u32, group: &Group) -> AppResult<()> {
        sqlx::query(&insert_group_sql(&self.converter, tenant_id))
            .bind(group.group_id.hyphenated())
            .bind(&group.title)
            .bind(group.description.as_deref())
            .bind(group.creation_date)
            .bind(fold_case(&group.title))
            .bind(group.description.as_deref().map(fold_case))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create group", e))?;

        Ok(())
    }

    async fn select_group(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Group>> {
        let sql = group_query(tenant_id).by_key_sql(&self.converter, &["g.group_id"]);

        let row = sqlx::query(&sql)
            .bind(id.hyphenated())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find group", e))?;

        row.as_ref().map(group_from_row).transpose()
    }

    async fn select_groups(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Group>> {
        let statement =
            list_statement(&self.converter, &group_query(tenant_id), None, filter, page)?;
        fetch_page(&self.pool, &statement, group_from_row).await
    }

    async fn update_group(&self, tenant_id: u32, group: &Group) -> AppResult<bool> {
        let result = sqlx::query(&update_group_sql(&self.converter, tenant_id))
            .bind(&group.title)
            .bind(group.description.as_deref())
            .bind(group.group_id.hyphenated())
            .bind(fold_case(&group.title))
            .bind(group.description.as_deref().map(fold_case))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update group", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_group(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin transaction", e))?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE group_id = ?1",
            table_name("group_users", tenant_id)
        ))
        .bind(id.hyphenated())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database("Failed to delete group memberships", e))?;

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE group_id = ?1",
            table_name("groups", tenant_id)
        ))
        .bind(id.hyphenated())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database("Failed to delete group", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit transaction", e))?;

        Ok(result.rows_affected() > 0)
    }
}
