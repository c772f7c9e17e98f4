//! Fake Device Client - 不联网的设备客户端
//!
//! 按完成顺序记录收到的命令，可为单条命令设置人为延迟，可注入失败。
//! 用于测试以及没有设备时离线运行。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{CommandFailure, CommandResult, DeviceControlPort};
use crate::domain::ControlCommand;

/// Fake Device Client
#[derive(Default)]
pub struct FakeDeviceClient {
    /// 按完成顺序记录的命令
    sent: Mutex<Vec<ControlCommand>>,
    delays: DashMap<ControlCommand, Duration>,
    failure: Mutex<Option<CommandFailure>>,
    status: Mutex<serde_json::Value>,
}

impl FakeDeviceClient {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(serde_json::json!({ "online": true })),
            ..Default::default()
        }
    }

    /// 为与 `command` 相同的命令设置延迟
    pub fn set_delay(&self, command: ControlCommand, delay: Duration) {
        self.delays.insert(command, delay);
    }

    /// 之后所有命令都以该原因失败；None 恢复正常
    pub fn fail_with(&self, failure: Option<CommandFailure>) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = failure;
        }
    }

    /// GetStatus 返回的内容
    pub fn set_status(&self, status: serde_json::Value) {
        if let Ok(mut slot) = self.status.lock() {
            *slot = status;
        }
    }

    /// 已完成的命令（完成顺序）
    pub fn sent(&self) -> Vec<ControlCommand> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DeviceControlPort for FakeDeviceClient {
    async fn send(&self, command: ControlCommand) -> CommandResult {
        let delay = self.delays.get(&command).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        tracing::debug!(command = %command, "FakeDeviceClient: command completed");

        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        if let Some(failure) = failure {
            return Err(failure);
        }

        let response = match &command {
            ControlCommand::GetStatus => self.status.lock().ok().map(|s| s.clone()),
            _ => None,
        };
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(command);
        }
        Ok(response)
    }

    async fn health_check(&self) -> bool {
        self.failure.lock().map(|f| f.is_none()).unwrap_or(false)
    }
}
