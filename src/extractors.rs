use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor whose rejections use the API error envelope
/// instead of axum's plain-text responses.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();

        if let Some(content_type) = req.headers().get(header::CONTENT_TYPE) {
            let media_type = content_type
                .to_str()
                .unwrap_or("")
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase();

            if media_type != "application/json" {
                return Err(ApiRejection {
                    path,
                    error: AppError::BadRequest(
                        "Content-Type must be application/json".to_string(),
                    ),
                });
            }
        }

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(ApiRejection {
                path,
                error: AppError::BadRequest(describe_rejection(&rejection)),
            }),
        }
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(e) => format!("Invalid request body: {}", e.body_text()),
        JsonRejection::JsonSyntaxError(e) => format!("Malformed JSON: {}", e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Content-Type must be application/json".to_string()
        }
        other => other.body_text(),
    }
}

/// Path parameters; undecodable segments are reported as a 400 envelope.
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => {
                let error = match &rejection {
                    PathRejection::FailedToDeserializePathParams(e) => {
                        AppError::BadRequest(format!("Invalid path parameter: {}", e.body_text()))
                    }
                    other => AppError::Internal(other.body_text()),
                };
                Err(ApiRejection {
                    path: parts.uri.path().to_string(),
                    error,
                })
            }
        }
    }
}

/// Query string extractor with envelope rejections
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => Err(ApiRejection {
                path: parts.uri.path().to_string(),
                error: AppError::BadRequest(format!(
                    "Invalid query string: {}",
                    rejection.body_text()
                )),
            }),
        }
    }
}

pub struct ApiRejection {
    path: String,
    error: AppError,
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, _) = self.error.to_response(&self.path);
        (status, body).into_response()
    }
}
