//! Preference Store Port - 本地偏好持久化
//!
//! - load 永不失败：读错误只记录日志并回落到缺省值
//! - save_field 一次持久化一个字段（write-through）
//! - 同键并发写按完成顺序后写者胜，不同键互不干扰

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PreferenceField, PreferenceRecord};

/// 存储错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Preference Store Port
#[async_trait]
pub trait PreferenceStorePort: Send + Sync {
    /// 读取全部已知键，缺失或损坏的键使用缺省值
    async fn load(&self) -> PreferenceRecord;

    /// 持久化单个字段
    async fn save_field(&self, field: PreferenceField) -> Result<(), StoreError>;
}
