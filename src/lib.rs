//! Vyz - 设备控制客户端与本地偏好同步
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Control: 控制量、命令、音效目录
//! - Preference: 偏好快照与存储编码
//! - Brightness Input: 分段亮度条输入映射
//!
//! 应用层 (application/):
//! - Ports: DeviceControlPort, PreferenceStorePort
//! - ControlService: 乐观更新 + write-through + 过期结果丢弃
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 设备客户端（reqwest）、Fake 设备客户端
//! - Persistence: Sled 偏好存储
//! - Memory: 内存偏好存储
//! - Events: 控制提示推送
//! - HTTP: 桩设备（axum）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
