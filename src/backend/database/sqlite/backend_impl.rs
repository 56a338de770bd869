use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use super::{
    SqliteCommentStore, SqliteEventStore, SqliteGroupStore, SqliteMembershipStore,
    SqliteTaskStore, SqliteUserStore,
};
use crate::backend::database::{
    DatabaseBackendConfig, MembershipScope, UnifiedCommentOps, UnifiedEventOps, UnifiedGroupOps,
    UnifiedMembershipOps, UnifiedTaskOps, UnifiedUserOps,
};
use crate::backend::{
    Backend, CommentBackend, EventBackend, GroupBackend, MembershipBackend, Page, TaskBackend,
    UserBackend,
};
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::{
    Comment, CommentChanges, Event, EventChanges, Group, GroupChanges, GroupUser,
    MembershipChanges, NewComment, NewEvent, NewGroup, NewTask, NewUser, Task, TaskChanges, User,
    UserChanges,
};
use crate::parser::Pagination;
use crate::password::PasswordManager;

/// SQLite database backend implementation
///
/// In-memory databases live as long as their single pooled connection, so
/// that connection is never recycled.
pub struct SqliteBackend {
    pool: SqlitePool,
    user_ops: UnifiedUserOps<SqliteUserStore>,
    group_ops: UnifiedGroupOps<SqliteGroupStore>,
    membership_ops: UnifiedMembershipOps<SqliteMembershipStore>,
    event_ops: UnifiedEventOps<SqliteEventStore>,
    task_ops: UnifiedTaskOps<SqliteTaskStore>,
    comment_ops: UnifiedCommentOps<SqliteCommentStore>,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool, passwords: PasswordManager) -> Self {
        Self {
            user_ops: UnifiedUserOps::new(SqliteUserStore::new(pool.clone()), passwords),
            group_ops: UnifiedGroupOps::new(SqliteGroupStore::new(pool.clone())),
            membership_ops: UnifiedMembershipOps::new(SqliteMembershipStore::new(pool.clone())),
            event_ops: UnifiedEventOps::new(SqliteEventStore::new(pool.clone())),
            task_ops: UnifiedTaskOps::new(SqliteTaskStore::new(pool.clone())),
            comment_ops: UnifiedCommentOps::new(SqliteCommentStore::new(pool.clone())),
            pool,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn connect_options(config: &DatabaseBackendConfig) -> AppResult<SqliteConnectOptions> {
        let options = if config.is_memory_database() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AppError::Configuration(format!("Invalid SQLite URL: {}", e)))?
        } else if config.connection_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(&config.connection_url)
                .map_err(|e| AppError::Configuration(format!("Invalid SQLite URL: {}", e)))?
        } else {
            // Bare file path such as `./buddies.db`
            SqliteConnectOptions::new().filename(&config.connection_url)
        };

        Ok(options.create_if_missing(true).foreign_keys(true))
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config.validate()?;

        let passwords = PasswordManager::from_config(&config.password)?;
        let options = Self::connect_options(config)?;

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout));

        pool_options = if config.is_memory_database() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        tracing::debug!(url = %config.connection_url, "SQLite pool ready");
        Ok(Self::new(pool, passwords))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;

        Ok(())
    }

    async fn init_tenant(&self, tenant_id: u32) -> AppResult<()> {
        super::schema::init_tenant_schema(&self.pool, tenant_id).await
    }
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn create_user(&self, tenant_id: u32, user: &NewUser) -> AppResult<User> {
        self.user_ops.create_user(tenant_id, user).await
    }

    async fn find_user_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<User>> {
        self.user_ops.find_user_by_id(tenant_id, id).await
    }

    async fn find_users(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<User>> {
        self.user_ops.find_users(tenant_id, filter, page).await
    }

    async fn update_user(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &UserChanges,
    ) -> AppResult<Option<User>> {
        self.user_ops.update_user(tenant_id, id, changes).await
    }

    async fn delete_user(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.user_ops.delete_user(tenant_id, id).await
    }
}

#[async_trait]
impl GroupBackend for SqliteBackend {
    async fn create_group(&self, tenant_id: u32, group: &NewGroup) -> AppResult<Group> {
        self.group_ops.create_group(tenant_id, group).await
    }

    async fn find_group_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Group>> {
        self.group_ops.find_group_by_id(tenant_id, id).await
    }

    async fn find_groups(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Group>> {
        self.group_ops.find_groups(tenant_id, filter, page).await
    }

    async fn update_group(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &GroupChanges,
    ) -> AppResult<Option<Group>> {
        self.group_ops.update_group(tenant_id, id, changes).await
    }

    async fn delete_group(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.group_ops.delete_group(tenant_id, id).await
    }
}

#[async_trait]
impl MembershipBackend for SqliteBackend {
    async fn create_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        administrator: bool,
    ) -> AppResult<GroupUser> {
        self.membership_ops
            .create_membership(tenant_id, group_id, user_id, administrator)
            .await
    }

    async fn find_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<GroupUser>> {
        self.membership_ops
            .find_membership(tenant_id, group_id, user_id)
            .await
    }

    async fn find_group_members(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>> {
        self.membership_ops
            .find_memberships(tenant_id, MembershipScope::Group(group_id), filter, page)
            .await
    }

    async fn find_user_groups(
        &self,
        tenant_id: u32,
        user_id: Uuid,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>> {
        self.membership_ops
            .find_memberships(tenant_id, MembershipScope::User(user_id), filter, page)
            .await
    }

    async fn update_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        changes: &MembershipChanges,
    ) -> AppResult<Option<GroupUser>> {
        self.membership_ops
            .update_membership(tenant_id, group_id, user_id, changes)
            .await
    }

    async fn delete_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<bool> {
        self.membership_ops
            .delete_membership(tenant_id, group_id, user_id)
            .await
    }
}

#[async_trait]
impl EventBackend for SqliteBackend {
    async fn create_event(&self, tenant_id: u32, event: &NewEvent) -> AppResult<Event> {
        self.event_ops.create_event(tenant_id, event).await
    }

    async fn find_event_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Event>> {
        self.event_ops.find_event_by_id(tenant_id, id).await
    }

    async fn find_events(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Event>> {
        self.event_ops.find_events(tenant_id, filter, page).await
    }

    async fn update_event(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &EventChanges,
    ) -> AppResult<Option<Event>> {
        self.event_ops.update_event(tenant_id, id, changes).await
    }

    async fn delete_event(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.event_ops.delete_event(tenant_id, id).await
    }
}

#[async_trait]
impl TaskBackend for SqliteBackend {
    async fn create_task(&self, tenant_id: u32, task: &NewTask) -> AppResult<Task> {
        self.task_ops.create_task(tenant_id, task).await
    }

    async fn find_task_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Task>> {
        self.task_ops.find_task_by_id(tenant_id, id).await
    }

    async fn find_tasks(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Task>> {
        self.task_ops.find_tasks(tenant_id, filter, page).await
    }

    async fn update_task(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &TaskChanges,
    ) -> AppResult<Option<Task>> {
        self.task_ops.update_task(tenant_id, id, changes).await
    }

    async fn delete_task(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.task_ops.delete_task(tenant_id, id).await
    }
}

#[async_trait]
impl CommentBackend for SqliteBackend {
    async fn create_comment(&self, tenant_id: u32, comment: &NewComment) -> AppResult<Comment> {
        self.comment_ops.create_comment(tenant_id, comment).await
    }

    async fn find_comment_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Comment>> {
        self.comment_ops.find_comment_by_id(tenant_id, id).await
    }

    async fn find_comments(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Comment>> {
        self.comment_ops.find_comments(tenant_id, filter, page).await
    }

    async fn update_comment(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &CommentChanges,
    ) -> AppResult<Option<Comment>> {
        self.comment_ops.update_comment(tenant_id, id, changes).await
    }

    async fn delete_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.comment_ops.delete_comment(tenant_id, id).await
    }
}
