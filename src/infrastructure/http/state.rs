//! Stub Device State
//!
//! 桩设备记住最后一次收到的目标值（设备端后写者胜）

use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::domain::{Level, SoundId};

/// 桩设备行为配置
#[derive(Debug, Clone, Default)]
pub struct StubDeviceConfig {
    /// 每个 /api 请求的人为延迟（毫秒）
    pub latency_ms: u64,
    /// 设置后所有 /api 请求都以该状态码拒绝
    pub reject_status: Option<u16>,
}

/// 正在播放的音效
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NowPlaying {
    pub sound: SoundId,
    pub volume: Level,
}

/// 设备可观察状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub brightness: Option<Level>,
    pub noise_suppression: Option<Level>,
    pub now_playing: Option<NowPlaying>,
    pub commands_received: u64,
}

/// 桩设备共享状态
pub struct StubState {
    pub config: StubDeviceConfig,
    device: Mutex<DeviceState>,
}

impl StubState {
    pub fn new(config: StubDeviceConfig) -> Self {
        Self {
            config,
            device: Mutex::new(DeviceState::default()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 应用一条命令
    pub fn update(&self, apply: impl FnOnce(&mut DeviceState)) {
        let mut device = self.device.lock().unwrap_or_else(|e| e.into_inner());
        apply(&mut device);
        device.commands_received += 1;
    }

    pub fn snapshot(&self) -> DeviceState {
        self.device
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
