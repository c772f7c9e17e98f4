//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（DeviceControl、PreferenceStore）
//! - sequencer: 按控制项的序号票，判定结果是否过期
//! - control_service: 本地快照、持久化与设备命令的编排
//! - error: 应用层错误定义

pub mod control_service;
pub mod error;
pub mod ports;
pub mod sequencer;

pub use control_service::{
    ControlOutcome, ControlService, ControlServiceConfig, Persistence, SyncReport,
};
pub use error::ApplicationError;
pub use ports::{
    CommandFailure, CommandResult, DeviceControlPort, PreferenceStorePort, StoreError,
};
pub use sequencer::{ControlSequencer, Ticket};
