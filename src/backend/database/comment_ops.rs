use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::table_name;
use super::filter::{FilterConverter, FilterTarget};
use super::query::EntityQuery;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::{Comment, CommentChanges, NewComment};
use crate::parser::Pagination;

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedComment {
    pub comment_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub creation_date: DateTime<Utc>,
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, tenant_id: u32, comment: &PreparedComment) -> AppResult<()>;

    async fn select_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Comment>>;

    async fn select_comments(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Comment>>;

    async fn update_comment(
        &self,
        tenant_id: u32,
        id: Uuid,
        message: &str,
        edition_date: DateTime<Utc>,
    ) -> AppResult<bool>;

    async fn delete_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

pub struct CommentProcessor;

impl CommentProcessor {
    /// Every edit is stamped, with the caller's date when one was supplied.
    pub fn apply_changes(current: Comment, changes: &CommentChanges) -> Comment {
        Comment {
            message: changes.message.clone().unwrap_or(current.message),
            edition_date: Some(
                changes
                    .edition_date
                    .unwrap_or_else(crate::utils::current_timestamp),
            ),
            ..current
        }
    }
}

pub fn comment_query(tenant_id: u32) -> EntityQuery {
    EntityQuery {
        columns: "c.comment_id, c.message, c.creation_date, c.edition_date, c.user_id, c.event_id, \
                  u.firstname AS user_firstname, u.lastname AS user_lastname, \
                  ev.title AS event_title, ev.description AS event_description",
        from: format!(
            "{} c JOIN {} u ON u.user_id = c.user_id JOIN {} ev ON ev.event_id = c.event_id",
            table_name("comments", tenant_id),
            table_name("users", tenant_id),
            table_name("events", tenant_id),
        ),
        target: FilterTarget::new("c", &[("user", "u"), ("event", "ev")]),
        order_by: "c.creation_date, c.comment_id",
    }
}

pub fn insert_comment_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "INSERT INTO {} (comment_id, event_id, user_id, message, creation_date, message_folded) \
         VALUES ({}, {}, {}, {}, {}, {})",
        table_name("comments", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
        converter.placeholder(4),
        converter.placeholder(5),
        converter.placeholder(6),
    )
}

pub fn update_comment_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "UPDATE {} SET message = {}, edition_date = {}, message_folded = {} WHERE comment_id = {}",
        table_name("comments", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(4),
        converter.placeholder(3),
    )
}

pub struct UnifiedCommentOps<T: CommentStore> {
    store: T,
}

impl<T: CommentStore> UnifiedCommentOps<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    pub async fn create_comment(&self, tenant_id: u32, comment: &NewComment) -> AppResult<Comment> {
        let prepared = PreparedComment {
            comment_id: Uuid::new_v4(),
            event_id: comment.event_id,
            user_id: comment.user_id,
            message: comment.message.clone(),
            creation_date: crate::utils::current_timestamp(),
        };
        self.store.insert_comment(tenant_id, &prepared).await?;

        self.store
            .select_comment(tenant_id, prepared.comment_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Comment {} vanished after insert",
                    prepared.comment_id
                ))
            })
    }

    pub async fn find_comment_by_id(
        &self,
        tenant_id: u32,
        id: Uuid,
    ) -> AppResult<Option<Comment>> {
        self.store.select_comment(tenant_id, id).await
    }

    pub async fn find_comments(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Comment>> {
        self.store.select_comments(tenant_id, filter, page).await
    }

    pub async fn update_comment(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &CommentChanges,
    ) -> AppResult<Option<Comment>> {
        let Some(current) = self.store.select_comment(tenant_id, id).await? else {
            return Ok(None);
        };

        let updated = CommentProcessor::apply_changes(current, changes);
        let edition_date = updated.edition_date.unwrap_or_else(crate::utils::current_timestamp);

        if self
            .store
            .update_comment(tenant_id, id, &updated.message, edition_date)
            .await?
        {
            Ok(Some(updated))
        } else {
            Ok(None)
        }
    }

    pub async fn delete_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.store.delete_comment(tenant_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventSummary, UserSummary};
    use chrono::TimeZone;

    fn comment() -> Comment {
        Comment {
            comment_id: Uuid::new_v4(),
            message: "See you there".to_string(),
            creation_date: Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap(),
            edition_date: None,
            user: UserSummary {
                user_id: Uuid::new_v4(),
                firstname: "Ann".to_string(),
                lastname: "Lee".to_string(),
            },
            event: EventSummary {
                event_id: Uuid::new_v4(),
                title: "BBQ".to_string(),
                description: "Bring sausages".to_string(),
            },
        }
    }

    #[test]
    fn test_edit_without_date_is_stamped_now() {
        let before = Utc::now();
        let updated = CommentProcessor::apply_changes(
            comment(),
            &CommentChanges {
                message: Some("Running late".to_string()),
                edition_date: None,
            },
        );

        assert_eq!(updated.message, "Running late");
        assert!(updated.edition_date.unwrap() >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn test_edit_keeps_supplied_date() {
        let stamp = Utc.with_ymd_and_hms(2026, 2, 2, 9, 30, 0).unwrap();
        let updated = CommentProcessor::apply_changes(
            comment(),
            &CommentChanges {
                message: None,
                edition_date: Some(stamp),
            },
        );

        assert_eq!(updated.message, "See you there");
        assert_eq!(updated.edition_date, Some(stamp));
    }
}
