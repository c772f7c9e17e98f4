//! Stub Device Middleware
//!
//! 注入延迟与强制拒绝，并记录 4xx/5xx

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use std::sync::Arc;
use std::time::Duration;

use super::state::StubState;

/// 桩设备行为中间件
pub async fn stub_behaviour_middleware(
    State(state): State<Arc<StubState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    if state.config.latency_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.latency_ms)).await;
    }

    let response = match state
        .config
        .reject_status
        .and_then(|code| StatusCode::from_u16(code).ok())
    {
        Some(status) => (status, "rejected by stub configuration").into_response(),
        None => next.run(request).await,
    };

    let status = response.status();
    if status.is_server_error() {
        tracing::error!(method = %method, uri = %uri, status = %status.as_u16(), "HTTP server error");
    } else if status.is_client_error() {
        tracing::warn!(method = %method, uri = %uri, status = %status.as_u16(), "HTTP client error");
    }

    response
}
