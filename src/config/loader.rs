//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, LogConfig};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `VYZ_DEVICE__BASE_URL=http://10.0.0.7:5000`
/// - `VYZ_DEVICE__TIMEOUT_MS=1500`
/// - `VYZ_AUDIO__EXCLUSIVE_PLAYBACK=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("device.base_url", "http://192.168.1.100:5000")?
        .set_default("device.timeout_ms", 3000)?
        .set_default("device.health_timeout_ms", 1000)?
        .set_default("storage.preferences_path", "data/preferences.sled")?
        .set_default("audio.default_volume", 50)?
        .set_default("audio.exclusive_playback", false)?
        .set_default("stub.host", "0.0.0.0")?
        .set_default("stub.port", 5000)?
        .set_default("stub.latency_ms", 0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 前缀 VYZ_，层级分隔符 __
    builder = builder.add_source(
        Environment::with_prefix("VYZ")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let url = config.device.base_url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Device base URL cannot be empty".to_string(),
        ));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "Device base URL must use http or https: {}",
            url
        )));
    }

    if config.device.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Device timeout cannot be 0".to_string(),
        ));
    }

    if config.audio.default_volume > 100 {
        return Err(ConfigError::ValidationError(format!(
            "Default volume must be within 0-100, got {}",
            config.audio.default_volume
        )));
    }

    if config.stub.port == 0 {
        return Err(ConfigError::ValidationError(
            "Stub port cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Device: {}", config.device.base_url);
    tracing::info!("Device Timeout: {}ms", config.device.timeout_ms);
    tracing::info!("Preferences: {}", config.storage.preferences_path);
    tracing::info!("Default Volume: {}", config.audio.default_volume);
    tracing::info!("Exclusive Playback: {}", config.audio.exclusive_playback);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

/// 初始化日志（`RUST_LOG` 优先于配置）
pub fn init_logging(config: &LogConfig, crate_filter: &str) {
    let log_filter = format!("{},{}={}", config.level, crate_filter, config.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
