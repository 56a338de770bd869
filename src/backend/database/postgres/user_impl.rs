use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::filter_impl::PostgresFilterConverter;
use super::rows::fetch_page;
use crate::backend::database::config::table_name;
use crate::backend::database::filter::fold_case;
use crate::backend::database::list_statement;
use crate::backend::database::rows::user_from_row;
use crate::backend::database::user_ops::{
    insert_user_sql, update_user_sql, user_query, PreparedUser, PreparedUserUpdate, UserStore,
};
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::User;
use crate::parser::Pagination;

/// PostgreSQL-specific implementation of UserStore
pub struct PostgresUserStore {
    pool: PgPool,
    converter: PostgresFilterConverter,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            converter: PostgresFilterConverter::new(),
        }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert_user(&self, tenant_id: u32, user: &PreparedUser) -> AppResult<()> {
        sqlx::query(&insert_user_sql(&self.converter, tenant_id))
            .bind(user.user_id)
            .bind(&user.mail)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.pseudo)
            .bind(&user.password_hash)
            .bind(user.active)
            .bind(user.creation_date)
            .bind(fold_case(&user.mail))
            .bind(fold_case(&user.firstname))
            .bind(fold_case(&user.lastname))
            .bind(fold_case(&user.pseudo))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create user", e))?;

        Ok(())
    }

    async fn select_user(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<User>> {
        let sql = user_query(tenant_id).by_key_sql(&self.converter, &["u.user_id"]);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn select_users(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<User>> {
        let statement = list_statement(&self.converter, &user_query(tenant_id), None, filter, page)?;
        fetch_page(&self.pool, &statement, user_from_row).await
    }

    async fn update_user(
        &self,
        tenant_id: u32,
        id: Uuid,
        update: &PreparedUserUpdate,
    ) -> AppResult<bool> {
        let result = sqlx::query(&update_user_sql(&self.converter, tenant_id))
            .bind(&update.mail)
            .bind(&update.firstname)
            .bind(&update.lastname)
            .bind(&update.pseudo)
            .bind(update.active)
            .bind(update.password_hash.as_deref())
            .bind(id)
            .bind(fold_case(&update.mail))
            .bind(fold_case(&update.firstname))
            .bind(fold_case(&update.lastname))
            .bind(fold_case(&update.pseudo))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin transaction", e))?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1",
            table_name("group_users", tenant_id)
        ))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database("Failed to delete user memberships", e))?;

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1",
            table_name("users", tenant_id)
        ))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database("Failed to delete user", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit transaction", e))?;

        Ok(result.rows_affected() > 0)
    }
}
