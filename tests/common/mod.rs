#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use buddies_corner::build_router;
use buddies_corner::config::{
    AppConfig, AuthConfig, BackendConfig, BasicAuthConfig, DatabaseConfig, PasswordConfig,
    ServerConfig, TenantConfig,
};
use buddies_corner::startup::setup_backend;
use serde_json::{json, Value};
use std::sync::Arc;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

pub const BASE: &str = "/api";

pub fn unauthenticated() -> AuthConfig {
    AuthConfig {
        auth_type: "unauthenticated".to_string(),
        token: None,
        basic: None,
    }
}

pub fn bearer(token: &str) -> AuthConfig {
    AuthConfig {
        auth_type: "bearer".to_string(),
        token: Some(token.to_string()),
        basic: None,
    }
}

pub fn basic(username: &str, password: &str) -> AuthConfig {
    AuthConfig {
        auth_type: "basic".to_string(),
        token: None,
        basic: Some(BasicAuthConfig {
            username: username.to_string(),
            password: password.to_string(),
        }),
    }
}

pub fn tenant(id: u32, url: &str, auth: AuthConfig) -> TenantConfig {
    TenantConfig {
        id,
        url: url.to_string(),
        auth,
    }
}

/// In-memory SQLite configuration with cheap password hashing.
pub fn create_test_app_config(tenants: Vec<TenantConfig>) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "warn".to_string(),
        },
        backend: BackendConfig {
            backend_type: "database".to_string(),
            database: Some(DatabaseConfig {
                db_type: "sqlite".to_string(),
                url: ":memory:".to_string(),
                max_connections: 1,
            }),
        },
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
        },
        tenants,
    }
}

pub async fn setup_test_app(app_config: AppConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let backend = setup_backend(&app_config).await?;
    Ok(build_router(backend, Arc::new(app_config)))
}

pub async fn setup_test_server(app_config: AppConfig) -> TestServer {
    let app = setup_test_app(app_config).await.unwrap();
    TestServer::new(app).unwrap()
}

/// Single unauthenticated tenant mounted at [`BASE`].
pub async fn default_server() -> TestServer {
    setup_test_server(create_test_app_config(vec![tenant(1, BASE, unauthenticated())])).await
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestDatabaseType {
    Sqlite,
    Postgres,
}

/// Holds the PostgreSQL container for as long as the test keeps it.
pub struct TestDatabase {
    pub database_type: TestDatabaseType,
    pub postgres_container: Option<ContainerAsync<Postgres>>,
}

/// Start a throwaway PostgreSQL container and return its connection URL.
pub async fn start_postgres_container(
) -> Result<(String, ContainerAsync<Postgres>), Box<dyn std::error::Error>> {
    let container = Postgres::default().start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);
    Ok((url, container))
}

/// Server on the requested database. Returns `None` when no container
/// runtime is available for PostgreSQL, so callers can skip.
pub async fn setup_test_server_with_db(
    tenants: Vec<TenantConfig>,
    database_type: TestDatabaseType,
) -> Option<(TestServer, TestDatabase)> {
    let mut app_config = create_test_app_config(tenants);

    let postgres_container = match database_type {
        TestDatabaseType::Sqlite => None,
        TestDatabaseType::Postgres => match start_postgres_container().await {
            Ok((url, container)) => {
                app_config.backend.database = Some(DatabaseConfig {
                    db_type: "postgres".to_string(),
                    url,
                    max_connections: 5,
                });
                Some(container)
            }
            Err(err) => {
                eprintln!("skipping PostgreSQL run, container failed to start: {}", err);
                return None;
            }
        },
    };

    let server = setup_test_server(app_config).await;
    Some((
        server,
        TestDatabase {
            database_type,
            postgres_container,
        },
    ))
}

pub fn create_test_user_json(pseudo: &str, firstname: &str, lastname: &str) -> Value {
    json!({
        "mail": format!("{}@example.com", pseudo),
        "firstname": firstname,
        "lastname": lastname,
        "pseudo": pseudo,
        "password": "correct horse"
    })
}

/// Create a user and return the created record.
pub async fn create_user(server: &TestServer, base: &str, pseudo: &str) -> Value {
    let response = server
        .post(&format!("{}/user", base))
        .json(&create_test_user_json(pseudo, &capitalize(pseudo), "Doe"))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["record"].clone()
}

pub async fn create_group(server: &TestServer, base: &str, title: &str) -> Value {
    let response = server
        .post(&format!("{}/group", base))
        .json(&json!({"title": title, "description": format!("All about {}", title)}))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["record"].clone()
}

pub async fn create_event(
    server: &TestServer,
    base: &str,
    group_id: &str,
    user_id: &str,
    title: &str,
    event_type: &str,
) -> Value {
    let response = server
        .post(&format!("{}/event", base))
        .json(&json!({
            "group_id": group_id,
            "creator_user_id": user_id,
            "type": event_type,
            "title": title,
            "description": format!("{} with friends", title),
            "location": "Lyon",
            "event_date": "2026-07-14T18:30:00Z"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["record"].clone()
}

pub async fn create_task(
    server: &TestServer,
    base: &str,
    event_id: &str,
    user_id: &str,
    title: &str,
) -> Value {
    let response = server
        .post(&format!("{}/task", base))
        .json(&json!({"event_id": event_id, "user_id": user_id, "title": title}))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["record"].clone()
}

pub fn id_of(record: &Value, key: &str) -> String {
    record[key].as_str().unwrap().to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
