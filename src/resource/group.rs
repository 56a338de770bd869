use axum::{
    extract::{Extension, State},
    http::{StatusCode, Uri},
    Json,
};
use std::collections::HashMap;
use tracing::info;

use super::{list_request, not_found, path_uuid, ApiResult, AppState, AtPath};
use crate::auth::TenantInfo;
use crate::backend::GroupBackend;
use crate::dto::{CreateGroupDto, UpdateGroupDto};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::filter::specs::GROUP_FILTER;
use crate::models::{ChangedResponse, CreatedResponse, Group, RecordList};

pub async fn create_group(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppJson(body): AppJson<CreateGroupDto>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<Group>>)> {
    let path = uri.path();
    let new_group = body.validate().at_path(path)?;

    let group = backend
        .create_group(tenant.tenant_id, &new_group)
        .await
        .at_path(path)?;

    info!(tenant_id = tenant.tenant_id, group_id = %group.group_id, "group created");
    Ok((StatusCode::CREATED, Json(CreatedResponse::new("group", group))))
}

pub async fn search_groups(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<Group>>> {
    let path = uri.path();
    let (filter, page) = list_request(&GROUP_FILTER, &params).at_path(path)?;

    let (records, count) = backend
        .find_groups(tenant.tenant_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn get_group(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(group_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<Group>> {
    let path = uri.path();
    let id = path_uuid(&group_id, path)?;

    backend
        .find_group_by_id(tenant.tenant_id, id)
        .await
        .at_path(path)?
        .map(Json)
        .ok_or_else(|| not_found("Group", id).to_response(path))
}

pub async fn update_group(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(group_id): AppPath<String>,
    uri: Uri,
    AppJson(body): AppJson<UpdateGroupDto>,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&group_id, path)?;
    let changes = body.validate().at_path(path)?;

    let group = backend
        .update_group(tenant.tenant_id, id, &changes)
        .await
        .at_path(path)?
        .ok_or_else(|| not_found("Group", id).to_response(path))?;

    Ok(Json(ChangedResponse::updated("group", group.group_id)))
}

/// Deleting a group also removes its memberships and events.
pub async fn delete_group(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(group_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&group_id, path)?;

    if !backend.delete_group(tenant.tenant_id, id).await.at_path(path)? {
        return Err(not_found("Group", id).to_response(path));
    }

    info!(tenant_id = tenant.tenant_id, group_id = %id, "group deleted");
    Ok(Json(ChangedResponse::deleted("group", id)))
}
