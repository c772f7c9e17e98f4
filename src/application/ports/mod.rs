//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod device_control;
mod preference_store;

pub use device_control::{CommandFailure, CommandResult, DeviceControlPort};
pub use preference_store::{PreferenceStorePort, StoreError};
