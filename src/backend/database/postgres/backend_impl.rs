use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use super::{
    PostgresCommentStore, PostgresEventStore, PostgresGroupStore, PostgresMembershipStore,
    PostgresTaskStore, PostgresUserStore,
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

/// PostgreSQL database backend implementation
///
/// Native UUID, BOOLEAN and TIMESTAMPTZ columns; every tenant gets its own
/// set of `t{id}_*` tables in the connected database.
pub struct PostgresBackend {
    pool: PgPool,
    user_ops: UnifiedUserOps<PostgresUserStore>,
    group_ops: UnifiedGroupOps<PostgresGroupStore>,
    membership_ops: UnifiedMembershipOps<PostgresMembershipStore>,
    event_ops: UnifiedEventOps<PostgresEventStore>,
    task_ops: UnifiedTaskOps<PostgresTaskStore>,
    comment_ops: UnifiedCommentOps<PostgresCommentStore>,
}

impl PostgresBackend {
    /// Create a new PostgreSQL backend instance
    pub fn new(pool: PgPool, passwords: PasswordManager) -> Self {
        Self {
            user_ops: UnifiedUserOps::new(PostgresUserStore::new(pool.clone()), passwords),
            group_ops: UnifiedGroupOps::new(PostgresGroupStore::new(pool.clone())),
            membership_ops: UnifiedMembershipOps::new(PostgresMembershipStore::new(pool.clone())),
            event_ops: UnifiedEventOps::new(PostgresEventStore::new(pool.clone())),
            task_ops: UnifiedTaskOps::new(PostgresTaskStore::new(pool.clone())),
            comment_ops: UnifiedCommentOps::new(PostgresCommentStore::new(pool.clone())),
            pool,
        }
    }

    /// Get the connection pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config.validate()?;

        let passwords = PasswordManager::from_config(&config.password)?;

        // Create connection pool
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.connection_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to PostgreSQL: {}", e)))?;

        tracing::debug!(max_connections = config.max_connections, "PostgreSQL pool ready");
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
impl UserBackend for PostgresBackend {
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
impl GroupBackend for PostgresBackend {
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
impl MembershipBackend for PostgresBackend {
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
impl EventBackend for PostgresBackend {
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
impl TaskBackend for PostgresBackend {
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
impl CommentBackend for PostgresBackend {
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
