//! Device Control Port - 设备控制抽象
//!
//! 把类型化的 ControlCommand 转成对单一设备的网络请求，
//! 所有传输结果统一归约为 CommandResult，不向调用方抛出故障。
//! 端口本身不重试、不排序、不持有可变状态。

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::ControlCommand;

/// 命令失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandFailure {
    #[error("Device unreachable: {message}")]
    NetworkUnreachable { message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Device rejected command: HTTP {status}: {body}")]
    DeviceRejected { status: u16, body: String },

    #[error("Unknown failure: {message}")]
    Unknown { message: String },
}

impl CommandFailure {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// 短分类名（日志与通知）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkUnreachable { .. } => "network_unreachable",
            Self::Timeout => "timeout",
            Self::DeviceRejected { .. } => "device_rejected",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// 命令结果：Ok(可选响应体) 或失败原因，没有部分成功
pub type CommandResult = Result<Option<serde_json::Value>, CommandFailure>;

/// Device Control Port
#[async_trait]
pub trait DeviceControlPort: Send + Sync {
    /// 发送一条命令
    async fn send(&self, command: ControlCommand) -> CommandResult;

    /// 检查设备是否在线
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
