//! HTTP Layer - 桩设备
//!
//! 按设备 API 提供同样的路由，用于没有真实设备时联调和测试

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_routes;
pub use server::{spawn_stub_device, ServerConfig, StubDeviceHandle, StubDeviceServer};
pub use state::{DeviceState, NowPlaying, StubDeviceConfig, StubState};
