use axum::{
    extract::{Extension, State},
    http::{StatusCode, Uri},
    Json,
};
use std::collections::HashMap;
use tracing::info;

use super::{list_request, not_found, path_uuid, ApiResult, AppState, AtPath};
use crate::auth::TenantInfo;
use crate::backend::UserBackend;
use crate::dto::{CreateUserDto, UpdateUserDto};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::filter::specs::USER_FILTER;
use crate::models::{ChangedResponse, CreatedResponse, RecordList, User};

pub async fn create_user(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppJson(body): AppJson<CreateUserDto>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<User>>)> {
    let path = uri.path();
    let new_user = body.validate().at_path(path)?;

    let user = backend
        .create_user(tenant.tenant_id, &new_user)
        .await
        .at_path(path)?;

    info!(tenant_id = tenant.tenant_id, user_id = %user.user_id, "user created");
    Ok((StatusCode::CREATED, Json(CreatedResponse::new("user", user))))
}

pub async fn search_users(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<User>>> {
    let path = uri.path();
    let (filter, page) = list_request(&USER_FILTER, &params).at_path(path)?;

    let (records, count) = backend
        .find_users(tenant.tenant_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn get_user(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(user_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<User>> {
    let path = uri.path();
    let id = path_uuid(&user_id, path)?;

    match backend.find_user_by_id(tenant.tenant_id, id).await.at_path(path)? {
        Some(user) => Ok(Json(user)),
        None => Err(not_found("User", id).to_response(path)),
    }
}

pub async fn update_user(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(user_id): AppPath<String>,
    uri: Uri,
    AppJson(body): AppJson<UpdateUserDto>,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&user_id, path)?;
    let changes = body.validate().at_path(path)?;

    match backend
        .update_user(tenant.tenant_id, id, &changes)
        .await
        .at_path(path)?
    {
        Some(user) => Ok(Json(ChangedResponse::updated("user", user.user_id))),
        None => Err(not_found("User", id).to_response(path)),
    }
}

pub async fn delete_user(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(user_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&user_id, path)?;

    if backend.delete_user(tenant.tenant_id, id).await.at_path(path)? {
        info!(tenant_id = tenant.tenant_id, user_id = %id, "user deleted");
        Ok(Json(ChangedResponse::deleted("user", id)))
    } else {
        Err(not_found("User", id).to_response(path))
    }
}
