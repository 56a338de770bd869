use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::filter_impl::SqliteFilterConverter;
use super::rows::fetch_page;
use crate::backend::database::comment_ops::{
    comment_query, insert_comment_sql, update_comment_sql, CommentStore, PreparedComment,
};
use crate::backend::database::config::table_name;
use crate::backend::database::filter::fold_case;
use crate::backend::database::list_statement;
use crate::backend::database::rows::comment_from_row;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::Comment;
use crate::parser::Pagination;

pub struct SqliteCommentStore {
    pool: SqlitePool,
    converter: SqliteFilterConverter,
}

impl SqliteCommentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            converter: SqliteFilterConverter::new(),
        }
    }
}

#[async_trait]
impl CommentStore for SqliteCommentStore {
    async fn insert_comment(&self, tenant_id: u32, comment: &PreparedComment) -> AppResult<()> {
        sqlx::query(&insert_comment_sql(&self.converter, tenant_id))
            .bind(comment.comment_id.hyphenated())
            .bind(comment.event_id.hyphenated())
            .bind(comment.user_id.hyphenated())
            .bind(&comment.message)
            .bind(comment.creation_date)
            .bind(fold_case(&comment.message))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create comment", e))?;

        Ok(())
    }

    async fn select_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Comment>> {
        let sql = comment_query(tenant_id).by_key_sql(&self.converter, &["c.comment_id"]);

        let row = sqlx::query(&sql)
            .bind(id.hyphenated())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find comment", e))?;

        row.as_ref().map(comment_from_row).transpose()
    }

    async fn select_comments(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Comment>> {
        let statement =
            list_statement(&self.converter, &comment_query(tenant_id), None, filter, page)?;
        fetch_page(&self.pool, &statement, comment_from_row).await
    }

    async fn update_comment(
        &self,
        tenant_id: u32,
        id: Uuid,
        message: &str,
        edition_date: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(&update_comment_sql(&self.converter, tenant_id))
            .bind(message)
            .bind(edition_date)
            .bind(id.hyphenated())
            .bind(fold_case(message))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update comment", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE comment_id = ?1",
            table_name("comments", tenant_id)
        ))
        .bind(id.hyphenated())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to delete comment", e))?;

        Ok(result.rows_affected() > 0)
    }
}
