use axum::{
    extract::{Extension, State},
    http::{StatusCode, Uri},
    Json,
};
use std::collections::HashMap;
use tracing::info;

use super::{
    ensure_group, ensure_user, list_request, not_found, path_uuid, ApiResult, AppState, AtPath,
};
use crate::auth::TenantInfo;
use crate::backend::EventBackend;
use crate::dto::{CreateEventDto, UpdateEventDto};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::filter::specs::EVENT_FILTER;
use crate::models::{ChangedResponse, CreatedResponse, Event, RecordList};

/// Create an event inside an existing group on behalf of an existing user.
pub async fn create_event(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppJson(body): AppJson<CreateEventDto>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<Event>>)> {
    let path = uri.path();
    let new_event = body.validate().at_path(path)?;

    ensure_group(backend.as_ref(), tenant.tenant_id, new_event.group_id)
        .await
        .at_path(path)?;
    ensure_user(backend.as_ref(), tenant.tenant_id, new_event.creator_user_id)
        .await
        .at_path(path)?;

    let event = backend
        .create_event(tenant.tenant_id, &new_event)
        .await
        .at_path(path)?;

    info!(
        tenant_id = tenant.tenant_id,
        event_id = %event.event_id,
        event_type = %event.event_type,
        "event created"
    );
    Ok((StatusCode::CREATED, Json(CreatedResponse::new("event", event))))
}

pub async fn search_events(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<Event>>> {
    let path = uri.path();
    let (filter, page) = list_request(&EVENT_FILTER, &params).at_path(path)?;

    let (records, count) = backend
        .find_events(tenant.tenant_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn get_event(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(event_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<Event>> {
    let path = uri.path();
    let id = path_uuid(&event_id, path)?;

    backend
        .find_event_by_id(tenant.tenant_id, id)
        .await
        .at_path(path)?
        .map(Json)
        .ok_or_else(|| not_found("Event", id).to_response(path))
}

pub async fn update_event(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(event_id): AppPath<String>,
    uri: Uri,
    AppJson(body): AppJson<UpdateEventDto>,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&event_id, path)?;
    let changes = body.validate().at_path(path)?;

    let event = backend
        .update_event(tenant.tenant_id, id, &changes)
        .await
        .at_path(path)?
        .ok_or_else(|| not_found("Event", id).to_response(path))?;

    Ok(Json(ChangedResponse::updated("event", event.event_id)))
}

/// Tasks and comments attached to the event go with it.
pub async fn delete_event(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(event_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&event_id, path)?;

    if !backend.delete_event(tenant.tenant_id, id).await.at_path(path)? {
        return Err(not_found("Event", id).to_response(path));
    }

    info!(tenant_id = tenant.tenant_id, event_id = %id, "event deleted");
    Ok(Json(ChangedResponse::deleted("event", id)))
}
