//! Data Transfer Objects - 桩设备请求/响应

use serde::{Deserialize, Serialize};

use super::state::DeviceState;
use crate::domain::{Level, SoundId};

/// 亮度 / 降噪设置请求
#[derive(Debug, Deserialize)]
pub struct LevelRequest {
    pub level: Level,
}

/// 播放请求
#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub sound: SoundId,
    pub volume: Level,
}

/// 命令确认
#[derive(Debug, Serialize)]
pub struct CommandAck {
    pub success: bool,
}

impl CommandAck {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// 设备状态响应
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub online: bool,
    #[serde(flatten)]
    pub state: DeviceState,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: &'static str,
}
