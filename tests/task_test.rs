mod common;

use axum::http::StatusCode;
use common::{create_event, create_group, create_task, create_user, default_server, id_of, BASE};
use serde_json::{json, Value};

#[tokio::test]
async fn test_task_lifecycle() {
    let server = default_server().await;
    let user_id = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let group_id = id_of(&create_group(&server, BASE, "Cooks").await, "group_id");
    let event_id = id_of(
        &create_event(&server, BASE, &group_id, &user_id, "Barbecue", "meal").await,
        "event_id",
    );

    let task = create_task(&server, BASE, &event_id, &user_id, "Bring charcoal").await;
    assert_eq!(task["achieve"], false);
    assert_eq!(task["event"]["title"], "Barbecue");
    assert_eq!(task["user"]["user_id"], user_id);
    let task_id = id_of(&task, "task_id");

    let response = server
        .patch(&format!("/api/task/{}", task_id))
        .json(&json!({"achieve": true}))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["id"], task_id);

    let fetched: Value = server.get(&format!("/api/task/{}", task_id)).await.json();
    assert_eq!(fetched["achieve"], true);
    assert_eq!(fetched["title"], "Bring charcoal");

    let done: Value = server
        .get("/api/task")
        .add_query_param("filter[achieve]", "true")
        .add_query_param("filter[event][event_id]", &event_id)
        .await
        .json();
    assert_eq!(done["count"], 1);

    server
        .delete(&format!("/api/task/{}", task_id))
        .await
        .assert_status(StatusCode::OK);
    let response = server.get(&format!("/api/task/{}", task_id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["message"],
        format!("Task not found with id : {}", task_id)
    );
}

#[tokio::test]
async fn test_task_requires_existing_event() {
    let server = default_server().await;
    let user_id = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let missing = uuid::Uuid::new_v4().to_string();

    let response = server
        .post("/api/task")
        .json(&json!({"event_id": missing, "user_id": user_id, "title": "Anything"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["message"],
        format!("Event not found with id : {}", missing)
    );
}

#[tokio::test]
async fn test_task_title_validation() {
    let server = default_server().await;

    let response = server
        .post("/api/task")
        .json(&json!({
            "event_id": uuid::Uuid::new_v4().to_string(),
            "user_id": uuid::Uuid::new_v4().to_string(),
            "title": ""
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["data"][0]["fieldName"], "title");
}
