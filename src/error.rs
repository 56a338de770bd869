use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// A single rejected input field with every rule it broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_name: String,
    pub property_errors: Vec<String>,
}

impl FieldError {
    pub fn new(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            property_errors: vec![message.into()],
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Database(String),
    Serialization(serde_json::Error),
    BadRequest(String),
    Validation(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    Unauthorized,
    Internal(String),
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
            AppError::BadRequest(e) => write!(f, "Bad request: {}", e),
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field_name.as_str()).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            AppError::NotFound(e) => write!(f, "Not found: {}", e),
            AppError::Conflict(e) => write!(f, "Conflict: {}", e),
            AppError::Unauthorized => write!(f, "Authentication required"),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database("Database operation failed", err)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Classify a driver error. Constraint violations become client errors,
    /// everything else is reported as a server-side database failure.
    pub fn database(context: &str, err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(format!(
                "{}: a record with the same key already exists",
                context
            )),
            Some(db_err) if db_err.is_foreign_key_violation() => AppError::BadRequest(format!(
                "{}: a referenced record does not exist",
                context
            )),
            _ => AppError::Database(format!("{}: {}", context, err)),
        }
    }

    /// Shorthand for a single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::Internal(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error envelope returned to API clients.
    pub fn to_response(&self, path: &str) -> (StatusCode, Json<serde_json::Value>) {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(errors) => json!({
                "statusCode": status.as_u16(),
                "message": "Bad Request - Validation failed",
                "data": errors,
                "path": path,
            }),
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message) => json!({
                "statusCode": status.as_u16(),
                "message": message,
                "path": path,
            }),
            AppError::Unauthorized => json!({
                "statusCode": status.as_u16(),
                "message": "Authentication required",
                "path": path,
            }),
            _ => {
                tracing::error!(path = %path, error = %self, "request failed");
                json!({
                    "statusCode": status.as_u16(),
                    "message": self.to_string(),
                    "path": path,
                })
            }
        };

        (status, Json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_envelope() {
        let err = AppError::Validation(vec![
            FieldError::new("mail", "mail must be an email"),
            FieldError::new("pseudo", "pseudo should not be empty"),
        ]);
        let (status, Json(body)) = err.to_response("/api/user");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "Bad Request - Validation failed");
        assert_eq!(body["path"], "/api/user");
        assert_eq!(body["data"][0]["fieldName"], "mail");
        assert_eq!(body["data"][1]["propertyErrors"][0], "pseudo should not be empty");
    }

    #[test]
    fn test_not_found_envelope() {
        let err = AppError::NotFound("Group not found with id : 42".to_string());
        let (status, Json(body)) = err.to_response("/api/group/42");

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Group not found with id : 42");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_server_errors_map_to_500() {
        for err in [
            AppError::Database("boom".into()),
            AppError::Internal("boom".into()),
            AppError::Configuration("boom".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
        assert_eq!(AppError::Conflict("dup".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }
}
