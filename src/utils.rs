//! Small helpers shared by handlers and the storage layer

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Current time at the precision every supported database keeps (microseconds),
/// so a freshly created record compares equal to its stored copy.
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Parse an id taken from the request path.
pub fn parse_path_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::BadRequest("Validation failed (uuid is expected)".to_string()))
}
