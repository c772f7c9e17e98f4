//! HTTP Device Client - 通过局域网 HTTP 控制设备
//!
//! 实现 DeviceControlPort trait
//!
//! 设备 API:
//! - POST /api/brightness         {"level": 0-100}
//! - POST /api/audio/suppression  {"level": 0-100}
//! - POST /api/audio/play         {"sound": "...", "volume": 0-100}
//! - POST /api/audio/stop         {}
//! - GET  /api/status             设备状态 JSON（由设备定义）
//! - GET  /health

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{CommandFailure, CommandResult, DeviceControlPort};
use crate::domain::{ControlCommand, Level, SoundId};

/// 设置类请求体
#[derive(Debug, Serialize)]
struct LevelRequest {
    level: Level,
}

/// 播放请求体
#[derive(Debug, Serialize)]
struct PlayRequest<'a> {
    sound: &'a SoundId,
    volume: Level,
}

/// 停止请求体（空对象）
#[derive(Debug, Serialize)]
struct EmptyRequest {}

/// HTTP 设备客户端配置
#[derive(Debug, Clone)]
pub struct HttpDeviceClientConfig {
    /// 设备基础 URL
    pub base_url: String,
    /// 单次请求超时（毫秒）
    pub timeout_ms: u64,
    /// 健康检查超时（毫秒）
    pub health_timeout_ms: u64,
}

impl Default for HttpDeviceClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.1.100:5000".to_string(),
            timeout_ms: 3000,
            health_timeout_ms: 1000,
        }
    }
}

impl HttpDeviceClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// HTTP 设备客户端
///
/// 无状态，可在所有调用方之间共享一个实例
pub struct HttpDeviceClient {
    client: Client,
    config: HttpDeviceClientConfig,
}

impl HttpDeviceClient {
    /// 创建新的客户端
    pub fn new(config: HttpDeviceClientConfig) -> Result<Self, CommandFailure> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| CommandFailure::unknown(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 命令 -> 请求
    fn request(&self, command: &ControlCommand) -> RequestBuilder {
        match command {
            ControlCommand::SetBrightness { level } => self
                .client
                .post(self.url("/api/brightness"))
                .json(&LevelRequest { level: *level }),
            ControlCommand::SetNoiseSuppression { level } => self
                .client
                .post(self.url("/api/audio/suppression"))
                .json(&LevelRequest { level: *level }),
            ControlCommand::PlaySound { sound, volume } => self
                .client
                .post(self.url("/api/audio/play"))
                .json(&PlayRequest {
                    sound,
                    volume: *volume,
                }),
            ControlCommand::StopSound => self
                .client
                .post(self.url("/api/audio/stop"))
                .json(&EmptyRequest {}),
            ControlCommand::GetStatus => self.client.get(self.url("/api/status")),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> CommandFailure {
    if e.is_timeout() {
        CommandFailure::Timeout
    } else if e.is_connect() {
        CommandFailure::unreachable(format!("Cannot connect to device: {}", e))
    } else {
        CommandFailure::unknown(e.to_string())
    }
}

#[async_trait]
impl DeviceControlPort for HttpDeviceClient {
    async fn send(&self, command: ControlCommand) -> CommandResult {
        tracing::debug!(
            base_url = %self.config.base_url,
            command = %command,
            "Sending device command"
        );

        let response = self
            .request(&command)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(command = command.name(), error = %e, "Failed to read rejection body");
                    String::new()
                }
            };
            tracing::warn!(command = command.name(), status = %status, "Device rejected command");
            return Err(CommandFailure::DeviceRejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload = match command {
            ControlCommand::GetStatus => Some(
                response
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            CommandFailure::Timeout
                        } else {
                            CommandFailure::unknown(format!("Invalid status body: {}", e))
                        }
                    })?,
            ),
            _ => None,
        };

        tracing::info!(command = command.name(), status = %status, "Device command completed");
        Ok(payload)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.url("/health"))
            .timeout(Duration::from_millis(self.config.health_timeout_ms))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::{spawn_stub_device, StubDeviceConfig};

    fn client_for(base_url: &str, timeout_ms: u64) -> HttpDeviceClient {
        HttpDeviceClient::new(HttpDeviceClientConfig::new(base_url).with_timeout_ms(timeout_ms))
            .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = HttpDeviceClientConfig::default();
        assert_eq!(config.base_url, "http://192.168.1.100:5000");
        assert_eq!(config.timeout_ms, 3000);
    }

    #[tokio::test]
    async fn test_set_brightness_ok_for_all_levels() {
        let stub = spawn_stub_device(StubDeviceConfig::default()).await.unwrap();
        let client = client_for(&stub.base_url(), 2000);

        for level in [0, 1, 50, 99, 100] {
            let result = client
                .send(ControlCommand::SetBrightness {
                    level: Level::clamped(level),
                })
                .await;
            assert_eq!(result, Ok(None));
        }
        assert_eq!(stub.state().brightness, Some(Level::MAX));
    }

    #[tokio::test]
    async fn test_timeout_resolves_to_failure() {
        let stub = spawn_stub_device(StubDeviceConfig {
            latency_ms: 500,
            ..Default::default()
        })
        .await
        .unwrap();
        let client = client_for(&stub.base_url(), 100);

        let result = client
            .send(ControlCommand::SetBrightness {
                level: Level::clamped(42),
            })
            .await;
        assert_eq!(result, Err(CommandFailure::Timeout));
    }

    #[tokio::test]
    async fn test_rejection_carries_status() {
        let stub = spawn_stub_device(StubDeviceConfig {
            reject_status: Some(503),
            ..Default::default()
        })
        .await
        .unwrap();
        let client = client_for(&stub.base_url(), 2000);

        let result = client.send(ControlCommand::StopSound).await;
        assert!(matches!(
            result,
            Err(CommandFailure::DeviceRejected { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_device() {
        // 端口 1 上没有服务，连接会被拒绝
        let client = client_for("http://127.0.0.1:1", 2000);
        let result = client.send(ControlCommand::GetStatus).await;
        assert!(matches!(
            result,
            Err(CommandFailure::NetworkUnreachable { .. })
        ));
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_idempotent_brightness() {
        let once = spawn_stub_device(StubDeviceConfig::default()).await.unwrap();
        let twice = spawn_stub_device(StubDeviceConfig::default()).await.unwrap();
        let command = ControlCommand::SetBrightness {
            level: Level::clamped(50),
        };

        client_for(&once.base_url(), 2000)
            .send(command.clone())
            .await
            .unwrap();
        let client = client_for(&twice.base_url(), 2000);
        client.send(command.clone()).await.unwrap();
        client.send(command).await.unwrap();

        assert_eq!(once.state().brightness, twice.state().brightness);
        assert_eq!(once.state().noise_suppression, twice.state().noise_suppression);
        assert_eq!(once.state().now_playing, twice.state().now_playing);
    }

    #[tokio::test]
    async fn test_play_stop_and_status() {
        let stub = spawn_stub_device(StubDeviceConfig::default()).await.unwrap();
        let client = client_for(&stub.base_url(), 2000);
        assert!(client.health_check().await);

        client
            .send(ControlCommand::PlaySound {
                sound: SoundId::new("2"),
                volume: Level::clamped(70),
            })
            .await
            .unwrap();
        let status = client.send(ControlCommand::GetStatus).await.unwrap().unwrap();
        assert_eq!(status["now_playing"]["sound"], "2");
        assert_eq!(status["now_playing"]["volume"], 70);

        client.send(ControlCommand::StopSound).await.unwrap();
        let status = client.send(ControlCommand::GetStatus).await.unwrap().unwrap();
        assert!(status["now_playing"].is_null());
    }
}
