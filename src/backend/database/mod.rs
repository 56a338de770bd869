//! Database abstraction layer
//!
//! Shared logic lives in the `*_ops` modules; each dialect only supplies a
//! store adapter per resource.
//!
//! # Architecture
//!
//! ```text
//! Unified*Ops (user_ops.rs, event_ops.rs, ...)
//!     ↓ *Store adapter traits
//! Database-specific implementations
//!     ├── postgres/ (PostgreSQL-specific code)
//!     └── sqlite/   (SQLite-specific code)
//! ```

pub mod comment_ops;
pub mod config;
pub mod event_ops;
pub mod filter;
pub mod group_ops;
pub mod membership_ops;
pub mod postgres;
pub mod query;
pub mod rows;
pub mod sqlite;
pub mod task_ops;
pub mod user_ops;


pub use config::DatabaseBackendConfig;
pub use filter::{FilterConverter, FilterTarget, SqlParam};
pub use query::{list_statement, EntityQuery, ListStatement};

pub use comment_ops::UnifiedCommentOps;
pub use event_ops::UnifiedEventOps;
pub use group_ops::UnifiedGroupOps;
pub use membership_ops::{MembershipScope, UnifiedMembershipOps};
pub use task_ops::UnifiedTaskOps;
pub use user_ops::UnifiedUserOps;

pub use postgres::PostgresBackend;
pub use sqlite::SqliteBackend;
