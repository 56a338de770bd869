mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{
    create_event, create_group, create_task, create_test_user_json, create_user, default_server,
    id_of, BASE,
};
use serde_json::{json, Value};

async fn seeded() -> (TestServer, String, String) {
    let server = default_server().await;
    let alice = id_of(&create_user(&server, BASE, "alice").await, "user_id");
    let bob = id_of(&create_user(&server, BASE, "bob").await, "user_id");
    let foodies = id_of(&create_group(&server, BASE, "Foodies").await, "group_id");
    let hikers = id_of(&create_group(&server, BASE, "Hikers").await, "group_id");

    create_event(&server, BASE, &foodies, &alice, "Pizza night", "meal").await;
    create_event(&server, BASE, &foodies, &bob, "Sushi lunch", "meal").await;
    create_event(&server, BASE, &hikers, &alice, "Mont Blanc", "trip").await;

    (server, alice, hikers)
}

async fn count(server: &TestServer, path: &str, params: &[(&str, &str)]) -> i64 {
    let mut request = server.get(path);
    for (key, value) in params {
        request = request.add_query_param(key, value);
    }
    let response = request.await;
    response.assert_status(StatusCode::OK);
    response.json::<Value>()["count"].as_i64().unwrap()
}

#[tokio::test]
async fn test_contains_is_case_insensitive() {
    let (server, _, _) = seeded().await;
    assert_eq!(count(&server, "/api/event", &[("filter[title]", "NIGHT")]).await, 1);
    assert_eq!(count(&server, "/api/user", &[("filter[mail]", "EXAMPLE.com")]).await, 2);
}

#[tokio::test]
async fn test_contains_folds_accented_letters() {
    let server = default_server().await;
    server
        .post("/api/user")
        .json(&create_test_user_json("elodie", "Élodie", "Bérénice"))
        .await
        .assert_status(StatusCode::CREATED);

    for value in ["Élodie", "élodie", "LODIE", "ÉLO"] {
        assert_eq!(
            count(&server, "/api/user", &[("filter[firstname]", value)]).await,
            1,
            "filter[firstname]={}",
            value
        );
    }
    assert_eq!(count(&server, "/api/user", &[("filter[lastname]", "BÉRÉ")]).await, 1);
    assert_eq!(count(&server, "/api/user", &[("filter[lastname]", "bere")]).await, 0);
}

#[tokio::test]
async fn test_equality_and_enum_filters() {
    let (server, _, hikers) = seeded().await;
    assert_eq!(count(&server, "/api/event", &[("filter[type]", "meal")]).await, 2);
    assert_eq!(
        count(&server, "/api/event", &[("filter[group_id]", hikers.as_str())]).await,
        1
    );
    assert_eq!(count(&server, "/api/user", &[("filter[active]", "false")]).await, 2);
}

#[tokio::test]
async fn test_relation_filters_combine_with_direct_ones() {
    let (server, alice, _) = seeded().await;
    assert_eq!(
        count(
            &server,
            "/api/event",
            &[
                ("filter[creator_user][user_id]", alice.as_str()),
                ("filter[type]", "meal"),
            ]
        )
        .await,
        1
    );
    assert_eq!(
        count(
            &server,
            "/api/event",
            &[("filter[group][title]", "food"), ("filter[creator_user][firstname]", "bo")]
        )
        .await,
        1
    );
}

#[tokio::test]
async fn test_partial_dates_match() {
    let (server, _, _) = seeded().await;
    assert_eq!(count(&server, "/api/event", &[("filter[event_date]", "2026-07")]).await, 3);
    assert_eq!(count(&server, "/api/event", &[("filter[event_date]", "2031")]).await, 0);
}

#[tokio::test]
async fn test_empty_values_are_ignored() {
    let (server, _, _) = seeded().await;
    assert_eq!(count(&server, "/api/event", &[("filter[title]", "")]).await, 3);
}

#[tokio::test]
async fn test_invalid_filters_are_reported_together() {
    let (server, _, _) = seeded().await;

    let response = server
        .get("/api/event")
        .add_query_param("filter[password]", "x")
        .add_query_param("filter[type]", "rave")
        .add_query_param("filter[group][group_id]", "nope")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["message"], "Bad Request - Validation failed");
    let fields: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["fieldName"].as_str().unwrap())
        .collect();
    assert_eq!(fields.len(), 3);
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"type"));
    assert!(fields.contains(&"group.group_id"));
}

#[tokio::test]
async fn test_user_password_is_never_filterable() {
    let (server, _, _) = seeded().await;
    let response = server
        .get("/api/user")
        .add_query_param("filter[password]", "correct")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_relation_filters() {
    let (server, alice, _) = seeded().await;
    let users: Value = server
        .get("/api/user")
        .add_query_param("filter[pseudo]", "bob")
        .await
        .json();
    let bob = id_of(&users["records"][0], "user_id");
    let events: Value = server
        .get("/api/event")
        .add_query_param("filter[title]", "pizza")
        .await
        .json();
    let pizza = id_of(&events["records"][0], "event_id");

    for (user_id, message) in [(&alice, "Je ramène le dessert"), (&bob, "Count me in")] {
        server
            .post("/api/comment")
            .json(&json!({"event_id": pizza, "user_id": user_id, "message": message}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    assert_eq!(count(&server, "/api/comment", &[("filter[user][firstname]", "BOB")]).await, 1);
    assert_eq!(count(&server, "/api/comment", &[("filter[event][title]", "pizza")]).await, 2);
    assert_eq!(count(&server, "/api/comment", &[("filter[event][title]", "sushi")]).await, 0);
    assert_eq!(count(&server, "/api/comment", &[("filter[message]", "RAMÈNE")]).await, 1);
}

#[tokio::test]
async fn test_unknown_fields_are_rejected_on_every_list_route() {
    let (server, alice, hikers) = seeded().await;
    let events: Value = server.get("/api/event").await.json();
    let event_id = id_of(&events["records"][0], "event_id");
    create_task(&server, BASE, &event_id, &alice, "Bring water").await;

    let group_members = format!("/api/group/{}/user", hikers);
    let user_groups = format!("/api/user/{}/group", alice);
    let routes: [(&str, Option<&str>); 7] = [
        ("/api/user", None),
        ("/api/group", None),
        (group_members.as_str(), Some("user")),
        (user_groups.as_str(), Some("group")),
        ("/api/event", Some("creator_user")),
        ("/api/task", Some("event")),
        ("/api/comment", Some("user")),
    ];

    for (path, relation) in routes {
        let mut request = server.get(path).add_query_param("filter[bogus]", "x");
        if let Some(relation) = relation {
            request = request.add_query_param(&format!("filter[{}][bogus]", relation), "x");
        }
        let response = request.await;
        assert_eq!(response.status_code(), 400, "{}: {}", path, response.text());

        let body: Value = response.json();
        let fields: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["fieldName"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"bogus"), "{}: {:?}", path, fields);
        if let Some(relation) = relation {
            let nested = format!("{}.bogus", relation);
            assert!(fields.contains(&nested.as_str()), "{}: {:?}", path, fields);
        }
    }
}
