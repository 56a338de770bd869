use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// First address of `x-forwarded-for`, else `x-real-ip`, else `-`.
fn client_address(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty());
    let real_ip = headers.get("x-real-ip").and_then(|h| h.to_str().ok());

    forwarded.or(real_ip).unwrap_or("-").to_string()
}

/// Emit one `access_log` event per request; server errors are logged at warn.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_address(request.headers());

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        warn!(target: "access_log", %method, %path, status = status.as_u16(), elapsed_ms, %client, "request failed");
    } else {
        info!(target: "access_log", %method, %path, status = status.as_u16(), elapsed_ms, %client, "request served");
    }

    response
}
