//! Notice Publisher Implementation
//!
//! 向界面层推送非阻塞的提示（toast），替代只打日志的失败处理

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::{Control, PreferenceKey};

/// 广播通道容量
const CHANNEL_CAPACITY: usize = 100;

/// 控制提示事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ControlNotice {
    /// 设备命令失败（本地值保持不变）
    CommandFailed {
        control: Control,
        reason: String,
        at: DateTime<Utc>,
    },
    /// 偏好未能持久化（本次会话不受影响，重启后可能丢失）
    PreferenceNotSaved {
        key: PreferenceKey,
        reason: String,
        at: DateTime<Utc>,
    },
}

/// 提示发布器
pub struct NoticePublisher {
    channel: broadcast::Sender<ControlNotice>,
}

impl NoticePublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅提示
    pub fn subscribe(&self) -> broadcast::Receiver<ControlNotice> {
        self.channel.subscribe()
    }

    /// 发布命令失败提示
    pub fn publish_command_failed(&self, control: Control, reason: &str) {
        self.publish(ControlNotice::CommandFailed {
            control,
            reason: reason.to_string(),
            at: Utc::now(),
        });
    }

    /// 发布偏好未保存提示
    pub fn publish_preference_not_saved(&self, key: PreferenceKey, reason: &str) {
        self.publish(ControlNotice::PreferenceNotSaved {
            key,
            reason: reason.to_string(),
            at: Utc::now(),
        });
    }

    fn publish(&self, notice: ControlNotice) {
        if let Err(e) = self.channel.send(notice) {
            tracing::debug!(error = %e, "Failed to publish notice (no receivers)");
        }
    }
}

impl Default for NoticePublisher {
    fn default() -> Self {
        Self::new()
    }
}
