mod common;

use axum::http::StatusCode;
use common::{create_group, default_server, BASE};
use serde_json::Value;

#[tokio::test]
async fn test_default_page_size_and_total_count() {
    let server = default_server().await;
    for i in 0..12 {
        create_group(&server, BASE, &format!("Group {:02}", i)).await;
    }

    let body: Value = server.get("/api/group").await.json();
    assert_eq!(body["count"], 12);
    assert_eq!(body["records"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_limit_and_offset_walk_in_creation_order() {
    let server = default_server().await;
    for i in 0..5 {
        create_group(&server, BASE, &format!("Group {}", i)).await;
    }

    let body: Value = server
        .get("/api/group")
        .add_query_param("page[limit]", 2)
        .add_query_param("page[offset]", 3)
        .await
        .json();
    assert_eq!(body["count"], 5);
    let titles: Vec<&str> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Group 3", "Group 4"]);

    let past_end: Value = server
        .get("/api/group")
        .add_query_param("page[offset]", 50)
        .await
        .json();
    assert_eq!(past_end["count"], 5);
    assert!(past_end["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_count_respects_filter_not_page() {
    let server = default_server().await;
    for title in ["Red", "Reading", "Blue"] {
        create_group(&server, BASE, title).await;
    }

    let body: Value = server
        .get("/api/group")
        .add_query_param("filter[title]", "re")
        .add_query_param("page[limit]", 1)
        .await
        .json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_page_parameters() {
    let server = default_server().await;

    let response = server
        .get("/api/group")
        .add_query_param("page[limit]", "ten")
        .add_query_param("page[offset]", -1)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let fields: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["fieldName"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["page[limit]", "page[offset]"]);
}
