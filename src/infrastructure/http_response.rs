// HTTP response utilities for proxied dashboards
use crate::infrastructure::proxy_gateway::ProxiedResponse;
use axum::{
    body::Body,
    http::{Response, StatusCode},
};

/// Turn an upstream answer into an axum response without buffering the body.
/// Upstream status codes, including errors, are passed through unchanged.
pub fn streamed_response(proxied: ProxiedResponse) -> Result<Response<Body>, StatusCode> {
    let ProxiedResponse {
        status,
        headers,
        body,
    } = proxied;

    let mut response = Response::builder()
        .status(status)
        .body(Body::from_stream(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    *response.headers_mut() = headers;
    Ok(response)
}
