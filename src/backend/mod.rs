use crate::error::AppResult;
use crate::filter::RenderedFilter;
use crate::models::{
    Comment, CommentChanges, Event, EventChanges, Group, GroupChanges, GroupUser,
    MembershipChanges, NewComment, NewEvent, NewGroup, NewTask, NewUser, Task, TaskChanges, User,
    UserChanges,
};
use crate::parser::Pagination;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub mod database;

/// Supported database backend types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    PostgreSQL,
    SQLite,
}

/// A page of records together with the total number of matches.
pub type Page<T> = (Vec<T>, i64);

/// Core backend abstraction
///
/// Every storage implementation provides connection management and
/// per-tenant schema creation on top of the resource traits below.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(config: &crate::backend::database::DatabaseBackendConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tenant-specific tables if they do not exist yet
    async fn init_tenant(&self, tenant_id: u32) -> AppResult<()>;
}

#[async_trait]
pub trait UserBackend: Backend {
    async fn create_user(&self, tenant_id: u32, user: &NewUser) -> AppResult<User>;

    async fn find_user_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<User>>;

    async fn find_users(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<User>>;

    /// Apply a partial update, returning `None` when the user does not exist
    async fn update_user(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &UserChanges,
    ) -> AppResult<Option<User>>;

    /// Delete a user along with everything that references it
    async fn delete_user(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait GroupBackend: Backend {
    async fn create_group(&self, tenant_id: u32, group: &NewGroup) -> AppResult<Group>;

    async fn find_group_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Group>>;

    async fn find_groups(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Group>>;

    async fn update_group(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &GroupChanges,
    ) -> AppResult<Option<Group>>;

    async fn delete_group(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

/// Group membership operations, keyed by `(group_id, user_id)`
#[async_trait]
pub trait MembershipBackend: Backend {
    async fn create_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        administrator: bool,
    ) -> AppResult<GroupUser>;

    async fn find_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<GroupUser>>;

    /// Memberships of one group
    async fn find_group_members(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>>;

    /// Memberships of one user
    async fn find_user_groups(
        &self,
        tenant_id: u32,
        user_id: Uuid,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>>;

    async fn update_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        changes: &MembershipChanges,
    ) -> AppResult<Option<GroupUser>>;

    async fn delete_membership(&self, tenant_id: u32, group_id: Uuid, user_id: Uuid)
        -> AppResult<bool>;
}

#[async_trait]
pub trait EventBackend: Backend {
    async fn create_event(&self, tenant_id: u32, event: &NewEvent) -> AppResult<Event>;

    async fn find_event_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Event>>;

    async fn find_events(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Event>>;

    async fn update_event(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &EventChanges,
    ) -> AppResult<Option<Event>>;

    async fn delete_event(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait TaskBackend: Backend {
    async fn create_task(&self, tenant_id: u32, task: &NewTask) -> AppResult<Task>;

    async fn find_task_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Task>>;

    async fn find_tasks(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Task>>;

    async fn update_task(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &TaskChanges,
    ) -> AppResult<Option<Task>>;

    async fn delete_task(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait CommentBackend: Backend {
    async fn create_comment(&self, tenant_id: u32, comment: &NewComment) -> AppResult<Comment>;

    async fn find_comment_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Comment>>;

    async fn find_comments(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Comment>>;

    async fn update_comment(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &CommentChanges,
    ) -> AppResult<Option<Comment>>;

    async fn delete_comment(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

/// Combined backend interface used by the HTTP layer
pub trait AppBackend:
    UserBackend + GroupBackend + MembershipBackend + EventBackend + TaskBackend + CommentBackend
{
}

impl<T> AppBackend for T where
    T: UserBackend + GroupBackend + MembershipBackend + EventBackend + TaskBackend + CommentBackend
{
}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on configuration
    pub async fn create(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Arc<dyn AppBackend>> {
        let backend: Arc<dyn AppBackend> = match config.database_type {
            DatabaseType::PostgreSQL => Arc::new(
                crate::backend::database::postgres::PostgresBackend::connect(config).await?,
            ),
            DatabaseType::SQLite => Arc::new(
                crate::backend::database::sqlite::SqliteBackend::connect(config).await?,
            ),
        };
        Ok(backend)
    }
}
