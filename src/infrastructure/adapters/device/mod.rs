//! Device Adapter - 设备控制客户端实现

mod fake_device_client;
mod http_device_client;

pub use fake_device_client::FakeDeviceClient;
pub use http_device_client::*;
