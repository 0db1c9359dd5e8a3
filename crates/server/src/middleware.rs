use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header carrying the caller's API key. Matched case-insensitively.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id stored in request extensions by [`request_id`].
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// API key authentication middleware
///
/// Wraps every route and the fallback; a rejected request reaches no
/// handler and no store.
pub async fn api_key_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(provided) = request.headers().get(API_KEY_HEADER) else {
        tracing::debug!(uri = %request.uri(), "request without API key");
        return Err(ServerError::MissingApiKey);
    };

    if !state.is_valid_api_key(provided.as_bytes()) {
        tracing::debug!(uri = %request.uri(), "request with invalid API key");
        return Err(ServerError::InvalidApiKey);
    }

    Ok(next.run(request).await)
}

/// Byte-exact comparison in constant time for equal-length inputs.
pub(crate) fn keys_match(expected: &[u8], provided: &[u8]) -> bool {
    expected.ct_eq(provided).into()
}

/// Request ID injection middleware
pub async fn request_id(mut request: Request, next: Next) -> Response {
    // Generate or extract request ID
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Logging middleware
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            request_id = %request_id,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            request_id = %request_id,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_is_exact() {
        assert!(keys_match(b"mi-clave-secreta-123", b"mi-clave-secreta-123"));
        assert!(!keys_match(b"mi-clave-secreta-123", b"mi-clave-secreta-12"));
        assert!(!keys_match(b"mi-clave-secreta-123", b"MI-CLAVE-SECRETA-123"));
        assert!(!keys_match(b"mi-clave-secreta-123", b""));
    }
}
