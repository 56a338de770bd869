use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::filter_impl::PostgresFilterConverter;
use super::rows::fetch_page;
use crate::backend::database::filter::SqlParam;
use crate::backend::database::list_statement;
use crate::backend::database::membership_ops::{
    delete_membership_sql, insert_membership_sql, membership_query, update_membership_sql,
    MembershipScope, MembershipStore, PreparedMembership, MEMBERSHIP_KEY,
};
use crate::backend::database::rows::membership_from_row;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::GroupUser;
use crate::parser::Pagination;

pub struct PostgresMembershipStore {
    pool: PgPool,
    converter: PostgresFilterConverter,
}

impl PostgresMembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            converter: PostgresFilterConverter::new(),
        }
    }
}

#[async_trait]
impl MembershipStore for PostgresMembershipStore {
    async fn insert_membership(
        &self,
        tenant_id: u32,
        membership: &PreparedMembership,
    ) -> AppResult<()> {
        sqlx::query(&insert_membership_sql(&self.converter, tenant_id))
            .bind(membership.group_id)
            .bind(membership.user_id)
            .bind(membership.administrator)
            .bind(membership.join_date)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create membership", e))?;

        Ok(())
    }

    async fn select_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<GroupUser>> {
        let sql = membership_query(tenant_id).by_key_sql(&self.converter, MEMBERSHIP_KEY);

        let row = sqlx::query(&sql)
            .bind(group_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find membership", e))?;

        row.as_ref().map(membership_from_row).transpose()
    }

    async fn select_memberships(
        &self,
        tenant_id: u32,
        scope: MembershipScope,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>> {
        let statement = list_statement(
            &self.converter,
            &membership_query(tenant_id),
            Some((scope.column(), SqlParam::Uuid(scope.id()))),
            filter,
            page,
        )?;
        fetch_page(&self.pool, &statement, membership_from_row).await
    }

    async fn update_administrator(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        administrator: bool,
    ) -> AppResult<bool> {
        let result = sqlx::query(&update_membership_sql(&self.converter, tenant_id))
            .bind(administrator)
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update membership", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(&delete_membership_sql(&self.converter, tenant_id))
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to delete membership", e))?;

        Ok(result.rows_affected() > 0)
    }
}
