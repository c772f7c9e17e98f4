//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod events;
pub mod http;
pub mod memory;
pub mod persistence;

pub use adapters::{FakeDeviceClient, HttpDeviceClient, HttpDeviceClientConfig};
pub use events::{ControlNotice, NoticePublisher};
pub use memory::InMemoryPreferenceStore;
pub use persistence::sled::{SledPreferenceConfig, SledPreferenceStore};
