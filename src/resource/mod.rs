//! HTTP handlers, one module per resource.

pub mod comment;
pub mod event;
pub mod group;
pub mod group_user;
pub mod health;
pub mod task;
pub mod user;

use axum::{http::StatusCode, Json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::{AppBackend, EventBackend, GroupBackend, UserBackend};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::filter::{render_filter, EntityFilterSpec, RenderedFilter};
use crate::parser::{ListQuery, Pagination};
use crate::utils::parse_path_id;

pub type AppState = (Arc<dyn AppBackend>, Arc<AppConfig>);

/// Error half of every handler result: status plus JSON envelope.
pub type ApiError = (StatusCode, Json<serde_json::Value>);
pub type ApiResult<T> = Result<T, ApiError>;

/// Attach the request path to an error so it can be rendered as a response.
pub trait AtPath<T> {
    fn at_path(self, path: &str) -> ApiResult<T>;
}

impl<T> AtPath<T> for AppResult<T> {
    fn at_path(self, path: &str) -> ApiResult<T> {
        self.map_err(|e| e.to_response(path))
    }
}

/// Read `filter[...]` and `page[...]` from the query string and render the
/// filter against an entity's rules.
pub fn list_request(
    spec: &EntityFilterSpec,
    params: &HashMap<String, String>,
) -> AppResult<(RenderedFilter, Pagination)> {
    let query = ListQuery::from_query(params)?;
    let filter = render_filter(spec, &query.filter)?;
    Ok((filter, query.page))
}

pub fn not_found(entity: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} not found with id : {}", entity, id))
}

pub fn membership_not_found(group_id: &str, user_id: &str) -> AppError {
    AppError::NotFound(format!(
        "GroupUser not found with user id : {} and group id : {}",
        user_id, group_id
    ))
}

/// Parse a path id, reporting a malformed one at `path`.
pub fn path_uuid(raw: &str, path: &str) -> ApiResult<Uuid> {
    parse_path_id(raw).at_path(path)
}

/// Fail with 404 unless the user exists.
pub async fn ensure_user(backend: &dyn AppBackend, tenant_id: u32, id: Uuid) -> AppResult<()> {
    match backend.find_user_by_id(tenant_id, id).await? {
        Some(_) => Ok(()),
        None => Err(not_found("User", id)),
    }
}

pub async fn ensure_group(backend: &dyn AppBackend, tenant_id: u32, id: Uuid) -> AppResult<()> {
    match backend.find_group_by_id(tenant_id, id).await? {
        Some(_) => Ok(()),
        None => Err(not_found("Group", id)),
    }
}

pub async fn ensure_event(backend: &dyn AppBackend, tenant_id: u32, id: Uuid) -> AppResult<()> {
    match backend.find_event_by_id(tenant_id, id).await? {
        Some(_) => Ok(()),
        None => Err(not_found("Event", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::specs::GROUP_FILTER;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_list_request_renders_filter_and_page() {
        let (filter, page) = list_request(
            &GROUP_FILTER,
            &params(&[("filter[title]", "hike"), ("page[limit]", "5")]),
        )
        .unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(page.limit, 5);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_list_request_rejects_unknown_field() {
        let result = list_request(&GROUP_FILTER, &params(&[("filter[colour]", "red")]));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_not_found_messages() {
        let id = Uuid::nil();
        match not_found("Task", id) {
            AppError::NotFound(message) => {
                assert_eq!(message, format!("Task not found with id : {}", id))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        match membership_not_found("g", "u") {
            AppError::NotFound(message) => {
                assert_eq!(message, "GroupUser not found with user id : u and group id : g")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_at_path_renders_envelope() {
        let result: AppResult<()> = Err(AppError::Conflict("taken".to_string()));
        let (status, Json(body)) = result.at_path("/api/user").unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["path"], "/api/user");
    }
}
