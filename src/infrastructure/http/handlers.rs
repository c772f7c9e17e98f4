//! Stub Device Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use super::dto::{CommandAck, HealthResponse, LevelRequest, PlayRequest, StatusResponse};
use super::state::{NowPlaying, StubState};

/// POST /api/brightness
pub async fn set_brightness(
    State(state): State<Arc<StubState>>,
    Json(req): Json<LevelRequest>,
) -> Json<CommandAck> {
    tracing::info!(level = %req.level, "Stub device: brightness");
    state.update(|device| device.brightness = Some(req.level));
    Json(CommandAck::ok())
}

/// POST /api/audio/suppression
pub async fn set_suppression(
    State(state): State<Arc<StubState>>,
    Json(req): Json<LevelRequest>,
) -> Json<CommandAck> {
    tracing::info!(level = %req.level, "Stub device: noise suppression");
    state.update(|device| device.noise_suppression = Some(req.level));
    Json(CommandAck::ok())
}

/// POST /api/audio/play
pub async fn play(
    State(state): State<Arc<StubState>>,
    Json(req): Json<PlayRequest>,
) -> Json<CommandAck> {
    tracing::info!(sound = %req.sound, volume = %req.volume, "Stub device: play");
    state.update(|device| {
        device.now_playing = Some(NowPlaying {
            sound: req.sound,
            volume: req.volume,
        })
    });
    Json(CommandAck::ok())
}

/// POST /api/audio/stop
pub async fn stop(State(state): State<Arc<StubState>>) -> Json<CommandAck> {
    tracing::info!("Stub device: stop");
    state.update(|device| device.now_playing = None);
    Json(CommandAck::ok())
}

/// GET /api/status
pub async fn status(State(state): State<Arc<StubState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        online: true,
        state: state.snapshot(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}
