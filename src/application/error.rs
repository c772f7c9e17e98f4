//! 应用层错误定义

use thiserror::Error;

/// 应用层错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    /// 音效不在目录中
    #[error("Unknown sound: {0}")]
    UnknownSound(String),
}

impl ApplicationError {
    /// 创建 UnknownSound 错误
    pub fn unknown_sound(id: impl Into<String>) -> Self {
        Self::UnknownSound(id.into())
    }
}
