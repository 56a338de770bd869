pub mod auth;
pub mod backend;
pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod filter;
pub mod logging;
pub mod models;
pub mod parser;
pub mod password;
pub mod resource;
pub mod routes;
pub mod startup;
pub mod utils;
pub mod validation;

// Re-export commonly used types for easier access
pub use error::{AppError, AppResult};
pub use models::{Comment, Event, Group, GroupUser, Task, User};
pub use routes::build_router;
