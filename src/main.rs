//! Vyz - 启动时恢复本地偏好并同步到设备

use std::sync::Arc;

use vyz::application::{ControlService, ControlServiceConfig};
use vyz::config::{init_logging, load_config, print_config};
use vyz::domain::Level;
use vyz::infrastructure::{
    HttpDeviceClient, HttpDeviceClientConfig, NoticePublisher, SledPreferenceConfig,
    SledPreferenceStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config.log, "vyz");
    print_config(&config);

    if let Some(parent) = std::path::Path::new(&config.storage.preferences_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let store = Arc::new(SledPreferenceStore::new(&SledPreferenceConfig {
        db_path: config.storage.preferences_path.clone(),
    })?);

    let device = Arc::new(HttpDeviceClient::new(HttpDeviceClientConfig {
        base_url: config.device.base_url.clone(),
        timeout_ms: config.device.timeout_ms,
        health_timeout_ms: config.device.health_timeout_ms,
    })?);

    let service = ControlService::new(
        device,
        store,
        NoticePublisher::new().arc(),
        ControlServiceConfig {
            default_volume: Level::clamped(i64::from(config.audio.default_volume)),
            exclusive_playback: config.audio.exclusive_playback,
        },
    );

    // 先恢复本地值：设备不可达时界面依然可以渲染
    service.restore().await;

    if !service.device_available().await {
        tracing::warn!(device = %config.device.base_url, "Device not reachable, skipping sync");
        return Ok(());
    }

    let report = service.sync_to_device().await;
    if !report.all_ok() {
        tracing::warn!(?report, "Some preferences could not be applied to the device");
    }

    match service.device_status().await {
        Ok(Some(status)) => tracing::info!(%status, "Device status"),
        Ok(None) => tracing::info!("Device returned no status"),
        Err(e) => tracing::warn!(error = %e, "Failed to fetch device status"),
    }

    Ok(())
}
