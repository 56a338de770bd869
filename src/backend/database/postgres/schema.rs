use crate::backend::database::config::table_name;
use crate::error::{AppError, AppResult};
use sqlx::PgPool;

/// Initialize tenant-specific database schema for PostgreSQL
///
/// This creates users, groups, memberships, events, tasks and comments
/// with cascading foreign keys and lookup indexes. Substring-searchable
/// text columns carry a lowercased `*_folded` twin.
pub async fn init_tenant_schema(pool: &PgPool, tenant_id: u32) -> AppResult<()> {
    let users = table_name("users", tenant_id);
    let groups = table_name("groups", tenant_id);
    let group_users = table_name("group_users", tenant_id);
    let events = table_name("events", tenant_id);
    let tasks = table_name("tasks", tenant_id);
    let comments = table_name("comments", tenant_id);

    let tables = [
        (
            "users",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {users} (
                    user_id UUID PRIMARY KEY,
                    mail VARCHAR(255) NOT NULL UNIQUE,
                    firstname VARCHAR(50) NOT NULL,
                    lastname VARCHAR(50) NOT NULL,
                    pseudo VARCHAR(50) NOT NULL,
                    mail_folded TEXT NOT NULL,
                    firstname_folded TEXT NOT NULL,
                    lastname_folded TEXT NOT NULL,
                    pseudo_folded TEXT NOT NULL,
                    password TEXT NOT NULL,
                    active BOOLEAN NOT NULL DEFAULT FALSE,
                    creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#
            ),
        ),
        (
            "groups",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {groups} (
                    group_id UUID PRIMARY KEY,
                    title VARCHAR(100) NOT NULL,
                    description VARCHAR(255),
                    title_folded TEXT NOT NULL,
                    description_folded TEXT,
                    creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#
            ),
        ),
        (
            "group_users",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {group_users} (
                    group_id UUID NOT NULL REFERENCES {groups} (group_id) ON DELETE CASCADE,
                    user_id UUID NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    administrator BOOLEAN NOT NULL DEFAULT FALSE,
                    join_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    PRIMARY KEY (group_id, user_id)
                )
                "#
            ),
        ),
        (
            "events",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {events} (
                    event_id UUID PRIMARY KEY,
                    group_id UUID NOT NULL REFERENCES {groups} (group_id) ON DELETE CASCADE,
                    creator_user_id UUID NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    "type" VARCHAR(20) NOT NULL DEFAULT 'other',
                    title VARCHAR(100) NOT NULL,
                    description VARCHAR(250) NOT NULL,
                    location VARCHAR(255) NOT NULL,
                    title_folded TEXT NOT NULL,
                    description_folded TEXT NOT NULL,
                    location_folded TEXT NOT NULL,
                    creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    event_date TIMESTAMPTZ NOT NULL
                )
                "#
            ),
        ),
        (
            "tasks",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {tasks} (
                    task_id UUID PRIMARY KEY,
                    event_id UUID NOT NULL REFERENCES {events} (event_id) ON DELETE CASCADE,
                    user_id UUID NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    title VARCHAR(100) NOT NULL,
                    title_folded TEXT NOT NULL,
                    achieve BOOLEAN NOT NULL DEFAULT FALSE
                )
                "#
            ),
        ),
        (
            "comments",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {comments} (
                    comment_id UUID PRIMARY KEY,
                    event_id UUID NOT NULL REFERENCES {events} (event_id) ON DELETE CASCADE,
                    user_id UUID NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    message VARCHAR(100) NOT NULL,
                    message_folded TEXT NOT NULL,
                    creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    edition_date TIMESTAMPTZ
                )
                "#
            ),
        ),
    ];

    for (name, sql) in &tables {
        sqlx::query(sql).execute(pool).await.map_err(|e| {
            AppError::Database(format!("Failed to create {} table: {}", name, e))
        })?;
    }

    create_indexes(pool, tenant_id).await
}

async fn create_indexes(pool: &PgPool, tenant_id: u32) -> AppResult<()> {
    let indexes = [
        ("users", "LOWER(mail)"),
        ("users", "creation_date"),
        ("groups", "creation_date"),
        ("group_users", "user_id"),
        ("events", "group_id"),
        ("events", "creator_user_id"),
        ("tasks", "event_id"),
        ("tasks", "user_id"),
        ("comments", "event_id"),
        ("comments", "user_id"),
    ];

    for (resource, expression) in indexes {
        let suffix: String = expression
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{}_{} ON {} ({})",
            tenant_id,
            resource,
            suffix,
            table_name(resource, tenant_id),
            expression
        );
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
    }

    Ok(())
}
