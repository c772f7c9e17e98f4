//! Events - 控制提示推送

mod publisher;

pub use publisher::{ControlNotice, NoticePublisher};
