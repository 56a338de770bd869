use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::table_name;
use super::filter::{FilterConverter, FilterTarget};
use super::query::EntityQuery;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::{GroupUser, MembershipChanges};
use crate::parser::Pagination;

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMembership {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub administrator: bool,
    pub join_date: DateTime<Utc>,
}

/// Which side of the membership a listing is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipScope {
    Group(Uuid),
    User(Uuid),
}

impl MembershipScope {
    pub fn column(&self) -> &'static str {
        match self {
            MembershipScope::Group(_) => "gu.group_id",
            MembershipScope::User(_) => "gu.user_id",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            MembershipScope::Group(id) | MembershipScope::User(id) => *id,
        }
    }
}

/// Database-specific adapter for group membership storage
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Fails with a conflict when the pair already exists
    async fn insert_membership(&self, tenant_id: u32, membership: &PreparedMembership)
        -> AppResult<()>;

    async fn select_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<GroupUser>>;

    async fn select_memberships(
        &self,
        tenant_id: u32,
        scope: MembershipScope,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>>;

    async fn update_administrator(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        administrator: bool,
    ) -> AppResult<bool>;

    async fn delete_membership(&self, tenant_id: u32, group_id: Uuid, user_id: Uuid)
        -> AppResult<bool>;
}

pub fn membership_query(tenant_id: u32) -> EntityQuery {
    EntityQuery {
        columns: "gu.group_id, gu.user_id, gu.administrator, gu.join_date, \
                  u.firstname AS user_firstname, u.lastname AS user_lastname, \
                  grp.title AS group_title, grp.description AS group_description",
        from: format!(
            "{} gu JOIN {} u ON u.user_id = gu.user_id JOIN {} grp ON grp.group_id = gu.group_id",
            table_name("group_users", tenant_id),
            table_name("users", tenant_id),
            table_name("groups", tenant_id),
        ),
        target: FilterTarget::new("gu", &[("user", "u"), ("group", "grp")]),
        order_by: "gu.join_date, gu.group_id, gu.user_id",
    }
}

pub const MEMBERSHIP_KEY: &[&str] = &["gu.group_id", "gu.user_id"];

pub fn insert_membership_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "INSERT INTO {} (group_id, user_id, administrator, join_date) VALUES ({}, {}, {}, {})",
        table_name("group_users", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
        converter.placeholder(4),
    )
}

pub fn update_membership_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "UPDATE {} SET administrator = {} WHERE group_id = {} AND user_id = {}",
        table_name("group_users", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
    )
}

pub fn delete_membership_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "DELETE FROM {} WHERE group_id = {} AND user_id = {}",
        table_name("group_users", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
    )
}

pub struct UnifiedMembershipOps<T: MembershipStore> {
    store: T,
}

impl<T: MembershipStore> UnifiedMembershipOps<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    pub async fn create_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        administrator: bool,
    ) -> AppResult<GroupUser> {
        let membership = PreparedMembership {
            group_id,
            user_id,
            administrator,
            join_date: crate::utils::current_timestamp(),
        };
        self.store.insert_membership(tenant_id, &membership).await?;

        self.store
            .select_membership(tenant_id, group_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Membership {} vanished after insert",
                    GroupUser::display_id(group_id, user_id)
                ))
            })
    }

    pub async fn find_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<GroupUser>> {
        self.store.select_membership(tenant_id, group_id, user_id).await
    }

    pub async fn find_memberships(
        &self,
        tenant_id: u32,
        scope: MembershipScope,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<GroupUser>> {
        self.store
            .select_memberships(tenant_id, scope, filter, page)
            .await
    }

    pub async fn update_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
        changes: &MembershipChanges,
    ) -> AppResult<Option<GroupUser>> {
        let Some(current) = self
            .store
            .select_membership(tenant_id, group_id, user_id)
            .await?
        else {
            return Ok(None);
        };

        let administrator = changes.administrator.unwrap_or(current.administrator);
        if administrator == current.administrator {
            return Ok(Some(current));
        }

        if !self
            .store
            .update_administrator(tenant_id, group_id, user_id, administrator)
            .await?
        {
            return Ok(None);
        }

        Ok(Some(GroupUser {
            administrator,
            ..current
        }))
    }

    pub async fn delete_membership(
        &self,
        tenant_id: u32,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<bool> {
        self.store
            .delete_membership(tenant_id, group_id, user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_column() {
        let id = Uuid::new_v4();
        assert_eq!(MembershipScope::Group(id).column(), "gu.group_id");
        assert_eq!(MembershipScope::User(id).column(), "gu.user_id");
        assert_eq!(MembershipScope::User(id).id(), id);
    }

    #[test]
    fn test_membership_query_joins_both_sides() {
        let query = membership_query(2);
        assert!(query.from.starts_with("t2_group_users gu"));
        assert!(query.from.contains("JOIN t2_users u"));
        assert!(query.from.contains("JOIN t2_groups grp"));
        assert_eq!(query.target.relations.len(), 2);
    }
}
