use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use crate::config::{AppConfig, TenantConfig};
use crate::error::AppError;

/// Tenant resolved from the request path, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct TenantInfo {
    pub tenant_id: u32,
    pub tenant_config: TenantConfig,
}

/// Resolve the tenant owning the request path and enforce its authentication.
pub async fn auth_middleware(
    State(app_config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let path = request.uri().path().to_string();

    if path == "/health" {
        return Ok(next.run(request).await);
    }

    let tenant = app_config.find_tenant_by_path(&path).ok_or_else(|| {
        AppError::NotFound(format!("Tenant not found for path '{}'", path)).to_response(&path)
    })?;

    if let Err(err) = authenticate(tenant, request.headers()) {
        tracing::debug!(tenant_id = tenant.id, path = %path, "authentication rejected");
        return Err(err.to_response(&path));
    }

    request.extensions_mut().insert(TenantInfo {
        tenant_id: tenant.id,
        tenant_config: tenant.clone(),
    });

    Ok(next.run(request).await)
}

/// Check the `Authorization` header against the tenant's configured scheme.
pub fn authenticate(tenant: &TenantConfig, headers: &HeaderMap) -> Result<(), AppError> {
    let auth = &tenant.auth;
    if auth.auth_type == "unauthenticated" {
        return Ok(());
    }

    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    match auth.auth_type.as_str() {
        "bearer" => {
            let provided = header_value
                .strip_prefix("Bearer ")
                .ok_or(AppError::Unauthorized)?;
            match &auth.token {
                Some(expected) if provided == expected => Ok(()),
                _ => Err(AppError::Unauthorized),
            }
        }
        "basic" => {
            let encoded = header_value
                .strip_prefix("Basic ")
                .ok_or(AppError::Unauthorized)?;
            let decoded = general_purpose::STANDARD
                .decode(encoded)
                .map_err(|_| AppError::Unauthorized)?;
            let credentials = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;
            let (username, password) = credentials
                .split_once(':')
                .ok_or(AppError::Unauthorized)?;

            match &auth.basic {
                Some(basic) if basic.username == username && basic.password == password => Ok(()),
                _ => Err(AppError::Unauthorized),
            }
        }
        other => Err(AppError::Configuration(format!(
            "Unknown authentication type '{}' for tenant {}",
            other, tenant.id
        ))),
    }
}
