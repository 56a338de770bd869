mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{create_event, create_group, create_user, default_server, id_of, BASE};
use serde_json::{json, Value};

async fn event_with_author(server: &TestServer) -> (String, String) {
    let user_id = id_of(&create_user(server, BASE, "alice").await, "user_id");
    let group_id = id_of(&create_group(server, BASE, "Book club").await, "group_id");
    let event = create_event(server, BASE, &group_id, &user_id, "Reading", "meeting").await;
    (id_of(&event, "event_id"), user_id)
}

async fn post_comment(server: &TestServer, event_id: &str, user_id: &str, message: &str) -> Value {
    let response = server
        .post("/api/comment")
        .json(&json!({"event_id": event_id, "user_id": user_id, "message": message}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["record"].clone()
}

#[tokio::test]
async fn test_comment_is_unedited_until_updated() {
    let server = default_server().await;
    let (event_id, user_id) = event_with_author(&server).await;

    let comment = post_comment(&server, &event_id, &user_id, "See you there").await;
    assert!(comment["edition_date"].is_null());
    assert_eq!(comment["event"]["event_id"], event_id);
    let comment_id = id_of(&comment, "comment_id");

    server
        .patch(&format!("/api/comment/{}", comment_id))
        .json(&json!({"message": "Running late"}))
        .await
        .assert_status(StatusCode::OK);

    let fetched: Value = server
        .get(&format!("/api/comment/{}", comment_id))
        .await
        .json();
    assert_eq!(fetched["message"], "Running late");
    assert!(fetched["edition_date"].is_string());
    assert_eq!(fetched["creation_date"], comment["creation_date"]);
}

#[tokio::test]
async fn test_supplied_edition_date_is_kept() {
    let server = default_server().await;
    let (event_id, user_id) = event_with_author(&server).await;
    let comment = post_comment(&server, &event_id, &user_id, "Hello").await;
    let comment_id = id_of(&comment, "comment_id");

    server
        .patch(&format!("/api/comment/{}", comment_id))
        .json(&json!({"edition_date": "2026-05-01T10:00:00Z"}))
        .await
        .assert_status(StatusCode::OK);

    let fetched: Value = server
        .get(&format!("/api/comment/{}", comment_id))
        .await
        .json();
    assert_eq!(fetched["message"], "Hello");
    assert_eq!(fetched["edition_date"], "2026-05-01T10:00:00Z");
}

#[tokio::test]
async fn test_list_comments_of_an_event() {
    let server = default_server().await;
    let (event_id, user_id) = event_with_author(&server).await;
    for message in ["First", "Second", "Third"] {
        post_comment(&server, &event_id, &user_id, message).await;
    }

    let all: Value = server
        .get("/api/comment")
        .add_query_param("filter[event_id]", &event_id)
        .await
        .json();
    assert_eq!(all["count"], 3);

    let matching: Value = server
        .get("/api/comment")
        .add_query_param("filter[message]", "ir")
        .await
        .json();
    assert_eq!(matching["count"], 2);
}

#[tokio::test]
async fn test_comment_message_is_bounded() {
    let server = default_server().await;
    let (event_id, user_id) = event_with_author(&server).await;

    let response = server
        .post("/api/comment")
        .json(&json!({
            "event_id": event_id,
            "user_id": user_id,
            "message": "a".repeat(101)
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    server
        .delete(&format!("/api/comment/{}", missing))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
