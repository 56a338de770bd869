use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::table_name;
use super::filter::{FilterConverter, FilterTarget};
use super::query::EntityQuery;
use crate::backend::Page;
use crate::error::{AppError, AppResult};
use crate::filter::RenderedFilter;
use crate::models::{Event, EventChanges, EventType, NewEvent};
use crate::parser::Pagination;

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEvent {
    pub event_id: Uuid,
    pub group_id: Uuid,
    pub creator_user_id: Uuid,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub location: String,
    pub creation_date: DateTime<Utc>,
    pub event_date: DateTime<Utc>,
}

/// Editable columns of an event after merging a partial update
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEventUpdate {
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert_event(&self, tenant_id: u32, event: &PreparedEvent) -> AppResult<()>;

    async fn select_event(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Event>>;

    async fn select_events(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Event>>;

    async fn update_event(
        &self,
        tenant_id: u32,
        id: Uuid,
        update: &PreparedEventUpdate,
    ) -> AppResult<bool>;

    async fn delete_event(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

pub struct EventProcessor;

impl EventProcessor {
    pub fn prepare_insert(event: &NewEvent) -> PreparedEvent {
        PreparedEvent {
            event_id: Uuid::new_v4(),
            group_id: event.group_id,
            creator_user_id: event.creator_user_id,
            event_type: event.event_type,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            creation_date: crate::utils::current_timestamp(),
            event_date: event.event_date,
        }
    }

    pub fn prepare_update(current: &Event, changes: &EventChanges) -> PreparedEventUpdate {
        PreparedEventUpdate {
            event_type: changes.event_type.unwrap_or(current.event_type),
            title: changes.title.clone().unwrap_or_else(|| current.title.clone()),
            description: changes
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            location: changes
                .location
                .clone()
                .unwrap_or_else(|| current.location.clone()),
            event_date: changes.event_date.unwrap_or(current.event_date),
        }
    }
}

pub fn event_query(tenant_id: u32) -> EntityQuery {
    EntityQuery {
        columns: "e.event_id, e.group_id, e.creator_user_id, e.\"type\", e.title, e.description, \
                  e.location, e.creation_date, e.event_date, \
                  cu.firstname AS user_firstname, cu.lastname AS user_lastname, \
                  grp.title AS group_title, grp.description AS group_description",
        from: format!(
            "{} e JOIN {} cu ON cu.user_id = e.creator_user_id JOIN {} grp ON grp.group_id = e.group_id",
            table_name("events", tenant_id),
            table_name("users", tenant_id),
            table_name("groups", tenant_id),
        ),
        target: FilterTarget::new("e", &[("creator_user", "cu"), ("group", "grp")]),
        order_by: "e.creation_date, e.event_id",
    }
}

pub fn insert_event_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    let placeholders: Vec<String> = (1..=12).map(|i| converter.placeholder(i)).collect();
    format!(
        "INSERT INTO {} (event_id, group_id, creator_user_id, \"type\", title, description, \
         location, creation_date, event_date, title_folded, description_folded, location_folded) \
         VALUES ({})",
        table_name("events", tenant_id),
        placeholders.join(", ")
    )
}

pub fn update_event_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "UPDATE {} SET \"type\" = {}, title = {}, description = {}, location = {}, event_date = {}, \
         title_folded = {}, description_folded = {}, location_folded = {} WHERE event_id = {}",
        table_name("events", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
        converter.placeholder(4),
        converter.placeholder(5),
        converter.placeholder(7),
        converter.placeholder(8),
        converter.placeholder(9),
        converter.placeholder(6),
    )
}

pub struct UnifiedEventOps<T: EventStore> {
    store: T,
}

impl<T: EventStore> UnifiedEventOps<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    pub async fn create_event(&self, tenant_id: u32, event: &NewEvent) -> AppResult<Event> {
        let prepared = EventProcessor::prepare_insert(event);
        self.store.insert_event(tenant_id, &prepared).await?;

        self.store
            .select_event(tenant_id, prepared.event_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Event {} vanished after insert", prepared.event_id))
            })
    }

    pub async fn find_event_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<Event>> {
        self.store.select_event(tenant_id, id).await
    }

    pub async fn find_events(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<Event>> {
        self.store.select_events(tenant_id, filter, page).await
    }

    pub async fn update_event(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &EventChanges,
    ) -> AppResult<Option<Event>> {
        let Some(current) = self.store.select_event(tenant_id, id).await? else {
            return Ok(None);
        };

        let update = EventProcessor::prepare_update(&current, changes);
        if !self.store.update_event(tenant_id, id, &update).await? {
            return Ok(None);
        }

        Ok(Some(Event {
            event_type: update.event_type,
            title: update.title,
            description: update.description,
            location: update.location,
            event_date: update.event_date,
            ..current
        }))
    }

    pub async fn delete_event(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.store.delete_event(tenant_id, id).await
    }
}
