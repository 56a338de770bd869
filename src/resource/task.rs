use axum::{
    extract::{Extension, State},
    http::{StatusCode, Uri},
    Json,
};
use std::collections::HashMap;

use super::{
    ensure_event, ensure_user, list_request, not_found, path_uuid, ApiResult, AppState, AtPath,
};
use crate::auth::TenantInfo;
use crate::backend::TaskBackend;
use crate::dto::{CreateTaskDto, UpdateTaskDto};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::filter::specs::TASK_FILTER;
use crate::models::{ChangedResponse, CreatedResponse, RecordList, Task};

pub async fn create_task(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppJson(body): AppJson<CreateTaskDto>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<Task>>)> {
    let path = uri.path();
    let new_task = body.validate().at_path(path)?;

    ensure_event(backend.as_ref(), tenant.tenant_id, new_task.event_id)
        .await
        .at_path(path)?;
    ensure_user(backend.as_ref(), tenant.tenant_id, new_task.user_id)
        .await
        .at_path(path)?;

    let task = backend
        .create_task(tenant.tenant_id, &new_task)
        .await
        .at_path(path)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("task", task))))
}

pub async fn search_tasks(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<Task>>> {
    let path = uri.path();
    let (filter, page) = list_request(&TASK_FILTER, &params).at_path(path)?;

    let (records, count) = backend
        .find_tasks(tenant.tenant_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn get_task(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(task_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<Task>> {
    let path = uri.path();
    let id = path_uuid(&task_id, path)?;

    backend
        .find_task_by_id(tenant.tenant_id, id)
        .await
        .at_path(path)?
        .map(Json)
        .ok_or_else(|| not_found("Task", id).to_response(path))
}

pub async fn update_task(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(task_id): AppPath<String>,
    uri: Uri,
    AppJson(body): AppJson<UpdateTaskDto>,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&task_id, path)?;
    let changes = body.validate().at_path(path)?;

    let task = backend
        .update_task(tenant.tenant_id, id, &changes)
        .await
        .at_path(path)?
        .ok_or_else(|| not_found("Task", id).to_response(path))?;

    Ok(Json(ChangedResponse::updated("task", task.task_id)))
}

pub async fn delete_task(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(task_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&task_id, path)?;

    if backend.delete_task(tenant.tenant_id, id).await.at_path(path)? {
        Ok(Json(ChangedResponse::deleted("task", id)))
    } else {
        Err(not_found("Task", id).to_response(path))
    }
}
