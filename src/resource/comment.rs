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
use crate::backend::CommentBackend;
use crate::dto::{CreateCommentDto, UpdateCommentDto};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::filter::specs::COMMENT_FILTER;
use crate::models::{ChangedResponse, Comment, CreatedResponse, RecordList};

pub async fn create_comment(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppJson(body): AppJson<CreateCommentDto>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<Comment>>)> {
    let path = uri.path();
    let new_comment = body.validate().at_path(path)?;

    ensure_event(backend.as_ref(), tenant.tenant_id, new_comment.event_id)
        .await
        .at_path(path)?;
    ensure_user(backend.as_ref(), tenant.tenant_id, new_comment.user_id)
        .await
        .at_path(path)?;

    let comment = backend
        .create_comment(tenant.tenant_id, &new_comment)
        .await
        .at_path(path)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("comment", comment)),
    ))
}

pub async fn search_comments(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    uri: Uri,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> ApiResult<Json<RecordList<Comment>>> {
    let path = uri.path();
    let (filter, page) = list_request(&COMMENT_FILTER, &params).at_path(path)?;

    let (records, count) = backend
        .find_comments(tenant.tenant_id, &filter, &page)
        .await
        .at_path(path)?;

    Ok(Json(RecordList { count, records }))
}

pub async fn get_comment(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(comment_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<Comment>> {
    let path = uri.path();
    let id = path_uuid(&comment_id, path)?;

    backend
        .find_comment_by_id(tenant.tenant_id, id)
        .await
        .at_path(path)?
        .map(Json)
        .ok_or_else(|| not_found("Comment", id).to_response(path))
}

/// Editing a comment stamps `edition_date`.
pub async fn update_comment(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(comment_id): AppPath<String>,
    uri: Uri,
    AppJson(body): AppJson<UpdateCommentDto>,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&comment_id, path)?;
    let changes = body.validate().at_path(path)?;

    let comment = backend
        .update_comment(tenant.tenant_id, id, &changes)
        .await
        .at_path(path)?
        .ok_or_else(|| not_found("Comment", id).to_response(path))?;

    Ok(Json(ChangedResponse::updated("comment", comment.comment_id)))
}

pub async fn delete_comment(
    State((backend, _)): State<AppState>,
    Extension(tenant): Extension<TenantInfo>,
    AppPath(comment_id): AppPath<String>,
    uri: Uri,
) -> ApiResult<Json<ChangedResponse>> {
    let path = uri.path();
    let id = path_uuid(&comment_id, path)?;

    if backend.delete_comment(tenant.tenant_id, id).await.at_path(path)? {
        Ok(Json(ChangedResponse::deleted("comment", id)))
    } else {
        Err(not_found("Comment", id).to_response(path))
    }
}
