mod common;

use axum::http::StatusCode;
use common::{create_group, create_user, default_server, id_of, BASE};
use serde_json::{json, Value};

#[tokio::test]
async fn test_group_lifecycle() {
    let server = default_server().await;

    let response = server
        .post("/api/group")
        .json(&json!({"title": "Climbers"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let record = response.json::<Value>()["record"].clone();
    assert_eq!(record["title"], "Climbers");
    assert!(record["description"].is_null());
    let group_id = id_of(&record, "group_id");

    let response = server
        .patch(&format!("/api/group/{}", group_id))
        .json(&json!({"description": "Weekend bouldering"}))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["id"], group_id);

    let fetched: Value = server.get(&format!("/api/group/{}", group_id)).await.json();
    assert_eq!(fetched["title"], "Climbers");
    assert_eq!(fetched["description"], "Weekend bouldering");

    let response = server.delete(&format!("/api/group/{}", group_id)).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "The group has been deleted successfully"
    );

    let response = server.get(&format!("/api/group/{}", group_id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["message"],
        format!("Group not found with id : {}", group_id)
    );
}

#[tokio::test]
async fn test_group_title_is_required_and_bounded() {
    let server = default_server().await;

    let response = server
        .post("/api/group")
        .json(&json!({"description": "no title"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["data"][0]["fieldName"], "title");
    assert_eq!(
        body["data"][0]["propertyErrors"][0],
        "title should not be null or undefined"
    );

    let response = server
        .post("/api/group")
        .json(&json!({"title": "x".repeat(101)}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["data"][0]["propertyErrors"][0],
        "title must be shorter than or equal to 100 characters"
    );
}

#[tokio::test]
async fn test_deleting_a_group_removes_its_events_and_memberships() {
    let server = default_server().await;
    let user = create_user(&server, BASE, "alice").await;
    let group = create_group(&server, BASE, "Runners").await;
    let user_id = id_of(&user, "user_id");
    let group_id = id_of(&group, "group_id");

    server
        .post(&format!("/api/group/{}/user/{}", group_id, user_id))
        .json(&json!({}))
        .await
        .assert_status(StatusCode::CREATED);
    let event =
        common::create_event(&server, BASE, &group_id, &user_id, "Marathon", "sport").await;

    server
        .delete(&format!("/api/group/{}", group_id))
        .await
        .assert_status(StatusCode::OK);

    server
        .get(&format!("/api/event/{}", id_of(&event, "event_id")))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let groups: Value = server
        .get(&format!("/api/user/{}/group", user_id))
        .await
        .json();
    assert_eq!(groups["count"], 0);
}
