//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 设备连接配置
    #[serde(default)]
    pub device: DeviceConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 桩设备配置
    #[serde(default)]
    pub stub: StubConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 设备连接配置
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// 设备基础 URL（局域网内单一固定地址）
    #[serde(default = "default_device_url")]
    pub base_url: String,

    /// 请求超时时间（毫秒）
    #[serde(default = "default_device_timeout")]
    pub timeout_ms: u64,

    /// 健康检查超时时间（毫秒）
    #[serde(default = "default_health_timeout")]
    pub health_timeout_ms: u64,
}

fn default_device_url() -> String {
    "http://192.168.1.100:5000".to_string()
}

fn default_device_timeout() -> u64 {
    3000
}

fn default_health_timeout() -> u64 {
    1000
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: default_device_url(),
            timeout_ms: default_device_timeout(),
            health_timeout_ms: default_health_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 偏好数据库路径
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,
}

fn default_preferences_path() -> String {
    "data/preferences.sled".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            preferences_path: default_preferences_path(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 播放音效时的音量（0-100）
    #[serde(default = "default_volume")]
    pub default_volume: u8,

    /// 同一时间只允许一个音效处于播放状态
    #[serde(default)]
    pub exclusive_playback: bool,
}

fn default_volume() -> u8 {
    50
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            exclusive_playback: false,
        }
    }
}

/// 桩设备配置
#[derive(Debug, Clone, Deserialize)]
pub struct StubConfig {
    /// 监听地址
    #[serde(default = "default_stub_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_stub_port")]
    pub port: u16,

    /// 人为延迟（毫秒）
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_stub_host() -> String {
    "0.0.0.0".to_string()
}

fn default_stub_port() -> u16 {
    5000
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            host: default_stub_host(),
            port: default_stub_port(),
            latency_ms: 0,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
