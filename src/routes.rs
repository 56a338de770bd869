use axum::{
    http::{Method, StatusCode, Uri},
    middleware,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::auth;
use crate::backend::AppBackend;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::logging;
use crate::resource::{comment, event, group, group_user, health, task, user};

/// Build the application router with every tenant's routes mounted under
/// its base path.
pub fn build_router(backend: Arc<dyn AppBackend>, config: Arc<AppConfig>) -> Router {
    let mut app = Router::new().route("/health", get(health::health));

    for tenant in &config.tenants {
        let base = tenant.base_path();
        tracing::debug!(tenant_id = tenant.id, base_path = %base, "mounting tenant routes");

        app = app
            .route(
                &format!("{}/user", base),
                get(user::search_users).post(user::create_user),
            )
            .route(
                &format!("{}/user/{{user_id}}", base),
                get(user::get_user)
                    .patch(user::update_user)
                    .delete(user::delete_user),
            )
            .route(
                &format!("{}/user/{{user_id}}/group", base),
                get(group_user::search_user_groups),
            )
            .route(
                &format!("{}/group", base),
                get(group::search_groups).post(group::create_group),
            )
            .route(
                &format!("{}/group/{{group_id}}", base),
                get(group::get_group)
                    .patch(group::update_group)
                    .delete(group::delete_group),
            )
            .route(
                &format!("{}/group/{{group_id}}/user", base),
                get(group_user::search_group_members),
            )
            .route(
                &format!("{}/group/{{group_id}}/user/{{user_id}}", base),
                get(group_user::get_membership)
                    .post(group_user::create_membership)
                    .patch(group_user::update_membership)
                    .delete(group_user::delete_membership),
            )
            .route(
                &format!("{}/event", base),
                get(event::search_events).post(event::create_event),
            )
            .route(
                &format!("{}/event/{{event_id}}", base),
                get(event::get_event)
                    .patch(event::update_event)
                    .delete(event::delete_event),
            )
            .route(
                &format!("{}/task", base),
                get(task::search_tasks).post(task::create_task),
            )
            .route(
                &format!("{}/task/{{task_id}}", base),
                get(task::get_task)
                    .patch(task::update_task)
                    .delete(task::delete_task),
            )
            .route(
                &format!("{}/comment", base),
                get(comment::search_comments).post(comment::create_comment),
            )
            .route(
                &format!("{}/comment/{{comment_id}}", base),
                get(comment::get_comment)
                    .patch(comment::update_comment)
                    .delete(comment::delete_comment),
            );
    }

    app.fallback(unknown_route)
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth::auth_middleware,
        ))
        .layer(middleware::from_fn(logging::logging_middleware))
        .with_state((backend, config))
}

async fn unknown_route(method: Method, uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    AppError::NotFound(format!("Cannot {} {}", method, uri.path())).to_response(uri.path())
}
