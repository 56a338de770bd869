use async_trait::async_trait;
use uuid::Uuid;

use super::config::table_name;
use super::filter::{FilterConverter, FilterTarget};
use super::query::EntityQuery;
use crate::backend::Page;
use crate::error::AppResult;
use crate::filter::RenderedFilter;
use crate::models::{Group, GroupChanges, NewGroup};
use crate::parser::Pagination;

/// Database-specific adapter for group storage
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn insert_group(&self, tenant_id: u32, group: &Group) -> AppResult<()>;

    async fn select_group(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Group>>;

    async fn select_groups(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Group>>;

    /// Persist title and description of `group`
    async fn update_group(&self, tenant_id: u32, group: &Group) -> AppResult<bool>;

    /// Remove the group and its memberships atomically
    async fn delete_group(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

pub struct GroupProcessor;

impl GroupProcessor {
    pub fn prepare_insert(group: &NewGroup) -> Group {
        Group {
            group_id: Uuid::new_v4(),
            title: group.title.clone(),
            description: group.description.clone(),
            creation_date: crate::utils::current_timestamp(),
        }
    }

    pub fn apply_changes(current: Group, changes: &GroupChanges) -> Group {
        Group {
            title: changes.title.clone().unwrap_or(current.title),
            description: changes.description.clone().or(current.description),
            ..current
        }
    }
}

pub fn group_query(tenant_id: u32) -> EntityQuery {
    EntityQuery {
        columns: "g.group_id, g.title, g.description, g.creation_date",
        from: format!("{} g", table_name("groups", tenant_id)),
        target: FilterTarget::new("g", &[]),
        order_by: "g.creation_date, g.group_id",
    }
}

pub fn insert_group_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "INSERT INTO {} (group_id, title, description, creation_date, title_folded, \
         description_folded) VALUES ({}, {}, {}, {}, {}, {})",
        table_name("groups", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
        converter.placeholder(4),
        converter.placeholder(5),
        converter.placeholder(6),
    )
}

pub fn update_group_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "UPDATE {} SET title = {}, description = {}, title_folded = {}, description_folded = {} \
         WHERE group_id = {}",
        table_name("groups", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(4),
        converter.placeholder(5),
        converter.placeholder(3),
    )
}

pub struct UnifiedGroupOps<T: GroupStore> {
    store: T,
}

impl<T: GroupStore> UnifiedGroupOps<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    pub async fn create_group(&self, tenant_id: u32, group: &NewGroup) -> AppResult<Group> {
        let group = GroupProcessor::prepare_insert(group);
        self.store.insert_group(tenant_id, &group).await?;
        Ok(group)
    }

    pub async fn find_group_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Group>> {
        self.store.select_group(tenant_id, id).await
    }

    pub async fn find_groups(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Group>> {
        self.store.select_groups(tenant_id, filter, page).await
    }

    pub async fn update_group(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &GroupChanges,
    ) -> AppResult<Option<Group>> {
        let Some(current) = self.store.select_group(tenant_id, id).await? else {
            return Ok(None);
        };

        let updated = GroupProcessor::apply_changes(current, changes);
        if self.store.update_group(tenant_id, &updated).await? {
            Ok(Some(updated))
        } else {
            Ok(None)
        }
    }

    pub async fn delete_group(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.store.delete_group(tenant_id, id).await
    }
}
