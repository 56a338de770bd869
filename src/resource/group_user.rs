//! Memberships, addressed through both the group and the user they join.

use axum::{
    extract::{Extension, State},
    http::{StatusCode, Uri},
    Json,
};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use super::{
    ensure_group, ensure_user, list_request, membership_not_found, path_uuid, ApiResult,
    AppState, AtPath,
};
use crate::auth::TenantInfo;
use crate::backend::MembershipBackend;
use crate::dto::GroupUserDto;
use crate::error::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::filter::specs::GROUP_USER_FILTER;
use crate::models::{ChangedResponse, CreatedResponse, GroupUser, RecordList};

const ENTITY: &str = "group user";

fn membership_ids(group_id: &str, user_id: &str, path: &str) -> ApiResult<(Uuid, Uuid)> {
    Ok((path_uuid(group_id, path)?, path_uuid(user_id, path)?))
}

pub async fn search_group_members(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(group_id): AppPath<String>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<GroupUser>>> {
    let path = uri.path();
    let group_id = path_uuid(&group_id, path)?;
    let (filter, page) = list_request(&GROUP_USER_FILTER, &params).at_path(path)?;

    ensure_group(backend.as_ref(), tenant.tenant_id, group_id)
        .await
        .at_path(path)?;

    let (records, count) = backend
        .find_group_members(tenant.tenant_id, group_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn search_user_groups(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(user_id): AppPath<String>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<GroupUser>>> {
    let path = uri.path();
    let user_id = path_uuid(&user_id, path)?;
    let (filter, page) = list_request(&GROUP_USER_FILTER, &params).at_path(path)?;

    ensure_user(backend.as_ref(), tenant.tenant_id, user_id)
        .await
        .at_path(path)?;

    let (records, count) = backend
        .find_user_groups(tenant.tenant_id, user_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn get_membership(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath((group_id, user_id)): AppPath<(String, String)>,
    uri: Uri,
) -> ApiResult<Json<GroupUser>> {
    let path = uri.path();
    let (gid, uid) = membership_ids(&group_id, &user_id, path)?;

    backend
        .find_membership(tenant.tenant_id, gid, uid)
        .await
        .at_path(path)?
        .map(Json)
        .ok_or_else(|| membership_not_found(&group_id, &user_id).to_response(path))
}

/// Add a user to a group. Both must exist and must not already be linked.
pub async fn create_membership(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath((group_id, user_id)): AppPath<(String, String)>,
    uri: Uri,
    AppJson(body): AppJson<GroupUserDto>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<GroupUser>>)> {
    let path = uri.path();
    let (gid, uid) = membership_ids(&group_id, &user_id, path)?;
    let changes = body.validate().at_path(path)?;

    ensure_group(backend.as_ref(), tenant.tenant_id, gid)
        .await
        .at_path(path)?;
    ensure_user(backend.as_ref(), tenant.tenant_id, uid)
        .await
        .at_path(path)?;

    let existing = backend
        .find_membership(tenant.tenant_id, gid, uid)
        .await
        .at_path(path)?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "GroupUser already exists with user id : {} and group id : {}",
            uid, gid
        ))
        .to_response(path));
    }

    let membership = backend
        .create_membership(
            tenant.tenant_id,
            gid,
            uid,
            changes.administrator.unwrap_or(false),
        )
        .await
        .at_path(path)?;

    info!(tenant_id = tenant.tenant_id, group_id = %gid, user_id = %uid, "membership created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(ENTITY, membership)),
    ))
}

pub async fn update_membership(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath((group_id, user_id)): AppPath<(String, String)>,
    uri: Uri,
    AppJson(body): AppJson<GroupUserDto>,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let (gid, uid) = membership_ids(&group_id, &user_id, path)?;
    let changes = body.validate().at_path(path)?;

    let updated = backend
        .update_membership(tenant.tenant_id, gid, uid, &changes)
        .await
        .at_path(path)?;

    match updated {
        Some(_) => Ok(Json(ChangedResponse::updated(
            ENTITY,
            GroupUser::display_id(gid, uid),
        ))),
        None => Err(membership_not_found(&group_id, &user_id).to_response(path)),
    }
}

pub async fn delete_membership(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath((group_id, user_id)): AppPath<(String, String)>,
    uri: Uri,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let (gid, uid) = membership_ids(&group_id, &user_id, path)?;

    let removed = backend
        .delete_membership(tenant.tenant_id, gid, uid)
        .await
        .at_path(path)?;
    if !removed {
        return Err(membership_not_found(&group_id, &user_id).to_response(path));
    }

    info!(tenant_id = tenant.tenant_id, group_id = %gid, user_id = %uid, "membership deleted");
    Ok(Json(ChangedResponse::deleted(
        ENTITY,
        GroupUser::display_id(gid, uid),
    )))
}
