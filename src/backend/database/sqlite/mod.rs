//! SQLite dialect: TEXT ids, `?n` placeholders and lowered `LIKE` matching.

pub mod backend_impl;
pub mod comment_impl;
pub mod event_impl;
pub mod filter_impl;
pub mod group_impl;
pub mod membership_impl;
pub mod rows;
pub mod schema;
pub mod task_impl;
pub mod user_impl;

pub use backend_impl::SqliteBackend;
pub use comment_impl::SqliteCommentStore;
pub use event_impl::SqliteEventStore;
pub use filter_impl::SqliteFilterConverter;
pub use group_impl::SqliteGroupStore;
pub use membership_impl::SqliteMembershipStore;
pub use task_impl::SqliteTaskStore;
pub use user_impl::SqliteUserStore;
