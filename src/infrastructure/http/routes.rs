//! Stub Device Routes
//!
//! - /api/brightness        POST
//! - /api/audio/suppression POST
//! - /api/audio/play        POST
//! - /api/audio/stop        POST
//! - /api/status            GET
//! - /health                GET

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::stub_behaviour_middleware;
use super::state::StubState;

/// 创建所有路由
pub fn create_routes(state: Arc<StubState>) -> Router<Arc<StubState>> {
    Router::new()
        .nest("/api", api_routes(state))
        .route("/health", get(handlers::health))
}

/// API 路由（受延迟与拒绝配置影响）
fn api_routes(state: Arc<StubState>) -> Router<Arc<StubState>> {
    Router::new()
        .route("/brightness", post(handlers::set_brightness))
        .route("/status", get(handlers::status))
        .nest("/audio", audio_routes())
        .layer(middleware::from_fn_with_state(state, stub_behaviour_middleware))
}

/// Audio 路由
fn audio_routes() -> Router<Arc<StubState>> {
    Router::new()
        .route("/suppression", post(handlers::set_suppression))
        .route("/play", post(handlers::play))
        .route("/stop", post(handlers::stop))
}
