use crate::backend::database::config::table_name;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Initialize tenant-specific database schema for SQLite
///
/// Ids are TEXT (hyphenated UUIDs), timestamps TEXT in RFC 3339 and flags
/// INTEGER. Every reference cascades on delete. Substring-searchable text
/// columns carry a lowercased `*_folded` twin.
pub async fn init_tenant_schema(pool: &SqlitePool, tenant_id: u32) -> AppResult<()> {
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
                    user_id TEXT PRIMARY KEY,
                    mail TEXT NOT NULL UNIQUE,
                    firstname TEXT NOT NULL,
                    lastname TEXT NOT NULL,
                    pseudo TEXT NOT NULL,
                    mail_folded TEXT NOT NULL,
                    firstname_folded TEXT NOT NULL,
                    lastname_folded TEXT NOT NULL,
                    pseudo_folded TEXT NOT NULL,
                    password TEXT NOT NULL,
                    active INTEGER NOT NULL DEFAULT 0,
                    creation_date TEXT NOT NULL
                )
                "#
            ),
        ),
        (
            "groups",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {groups} (
                    group_id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    title_folded TEXT NOT NULL,
                    description_folded TEXT,
                    creation_date TEXT NOT NULL
                )
                "#
            ),
        ),
        (
            "group_users",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {group_users} (
                    group_id TEXT NOT NULL REFERENCES {groups} (group_id) ON DELETE CASCADE,
                    user_id TEXT NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    administrator INTEGER NOT NULL DEFAULT 0,
                    join_date TEXT NOT NULL,
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
                    event_id TEXT PRIMARY KEY,
                    group_id TEXT NOT NULL REFERENCES {groups} (group_id) ON DELETE CASCADE,
                    creator_user_id TEXT NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    "type" TEXT NOT NULL DEFAULT 'other',
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    location TEXT NOT NULL,
                    title_folded TEXT NOT NULL,
                    description_folded TEXT NOT NULL,
                    location_folded TEXT NOT NULL,
                    creation_date TEXT NOT NULL,
                    event_date TEXT NOT NULL
                )
                "#
            ),
        ),
        (
            "tasks",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {tasks} (
                    task_id TEXT PRIMARY KEY,
                    event_id TEXT NOT NULL REFERENCES {events} (event_id) ON DELETE CASCADE,
                    user_id TEXT NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    title_folded TEXT NOT NULL,
                    achieve INTEGER NOT NULL DEFAULT 0
                )
                "#
            ),
        ),
        (
            "comments",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {comments} (
                    comment_id TEXT PRIMARY KEY,
                    event_id TEXT NOT NULL REFERENCES {events} (event_id) ON DELETE CASCADE,
                    user_id TEXT NOT NULL REFERENCES {users} (user_id) ON DELETE CASCADE,
                    message TEXT NOT NULL,
                    message_folded TEXT NOT NULL,
                    creation_date TEXT NOT NULL,
                    edition_date TEXT
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

/// Create lookup indexes for the foreign keys and default orderings
async fn create_indexes(pool: &SqlitePool, tenant_id: u32) -> AppResult<()> {
    let indexes = [
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

    for (resource, column) in indexes {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{}_{} ON {} ({})",
            tenant_id,
            resource,
            column,
            table_name(resource, tenant_id),
            column
        );
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
    }

    Ok(())
}

/// Drop tenant-specific schema (for cleanup/testing)
#[cfg(test)]
pub async fn drop_tenant_schema(pool: &SqlitePool, tenant_id: u32) -> AppResult<()> {
    // Children first
    for resource in ["comments", "tasks", "events", "group_users", "groups", "users"] {
        let table = table_name(resource, tenant_id);
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to drop table {}: {}", table, e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        init_tenant_schema(&pool, 1).await.unwrap();
        init_tenant_schema(&pool, 1).await.unwrap();
        init_tenant_schema(&pool, 2).await.unwrap();

        for table in ["t1_users", "t1_comments", "t2_group_users"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0);
        }

        drop_tenant_schema(&pool, 1).await.unwrap();
        assert!(sqlx::query("SELECT 1 FROM t1_users")
            .fetch_optional(&pool)
            .await
            .is_err());
    }
}
