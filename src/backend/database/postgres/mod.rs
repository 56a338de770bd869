//! PostgreSQL dialect: native UUID columns, `$n` placeholders and `ILIKE`.

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

pub use backend_impl::PostgresBackend;
pub use comment_impl::PostgresCommentStore;
pub use event_impl::PostgresEventStore;
pub use filter_impl::PostgresFilterConverter;
pub use group_impl::PostgresGroupStore;
pub use membership_impl::PostgresMembershipStore;
pub use task_impl::PostgresTaskStore;
pub use user_impl::PostgresUserStore;
