mod common;

use axum::http::StatusCode;
use common::{create_event, create_group, create_user, default_server, id_of, BASE};
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_event_embeds_creator_and_group() {
    let server = default_server().await;
    let user_id = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let group_id = id_of(&create_group(&server, BASE, "Foodies").await, "group_id");

    let event = create_event(&server, BASE, &group_id, &user_id, "Pizza night", "meal").await;
    assert_eq!(event["type"], "meal");
    assert_eq!(event["creator_user"]["user_id"], user_id);
    assert_eq!(event["creator_user"]["firstname"], "Alice");
    assert_eq!(event["group"]["group_id"], group_id);
    assert_eq!(event["group"]["description"], "All about Foodies");
    assert!(event["creator_user"].get("mail").is_none());

    let fetched: Value = server
        .get(&format!("/api/event/{}", id_of(&event, "event_id")))
        .await
        .json();
    assert_eq!(fetched, event);
}

#[tokio::test]
async fn test_event_type_defaults_to_other() {
    let server = default_server().await;
    let user_id = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let group_id = id_of(&create_group(&server, BASE, "Foodies").await, "group_id");

    let response = server
        .post("/api/event")
        .json(&json!({
            "group_id": group_id,
            "creator_user_id": user_id,
            "title": "Catch up",
            "description": "Whatever happens",
            "location": "Paris",
            "event_date": "2026-09-01T12:00:00Z"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["record"]["type"], "other");
}

#[tokio::test]
async fn test_create_event_validation() {
    let server = default_server().await;

    let response = server
        .post("/api/event")
        .json(&json!({
            "group_id": "not-a-uuid",
            "title": "Party",
            "description": "",
            "location": "Home"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let fields: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["fieldName"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["group_id", "creator_user_id", "event_date", "description"]
    );

    let response = server
        .post("/api/event")
        .json(&json!({"type": "rave"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_event_requires_existing_references() {
    let server = default_server().await;
    let user_id = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let missing = uuid::Uuid::new_v4().to_string();

    let response = server
        .post("/api/event")
        .json(&json!({
            "group_id": missing,
            "creator_user_id": user_id,
            "title": "Party",
            "description": "Big one",
            "location": "Home",
            "event_date": "2026-12-31T22:00:00Z"
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["message"],
        format!("Group not found with id : {}", missing)
    );
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let server = default_server().await;
    let user_id = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let group_id = id_of(&create_group(&server, BASE, "Travellers").await, "group_id");
    let event = create_event(&server, BASE, &group_id, &user_id, "Road trip", "trip").await;
    let event_id = id_of(&event, "event_id");

    let response = server
        .patch(&format!("/api/event/{}", event_id))
        .json(&json!({"location": "Lisbon", "type": "outing"}))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "The event has been updated successfully"
    );

    let fetched: Value = server.get(&format!("/api/event/{}", event_id)).await.json();
    assert_eq!(fetched["location"], "Lisbon");
    assert_eq!(fetched["type"], "outing");
    assert_eq!(fetched["title"], "Road trip");

    server
        .delete(&format!("/api/event/{}", event_id))
        .await
        .assert_status(StatusCode::OK);
    server
        .patch(&format!("/api/event/{}", event_id))
        .json(&json!({"title": "Gone"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
