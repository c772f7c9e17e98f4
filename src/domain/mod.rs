//! 领域层
//!
//! - control: 控制量、命令、音效目录
//! - preference: 本地偏好快照及其存储编码
//! - brightness_input: 分段亮度条输入映射

pub mod brightness_input;
pub mod control;
pub mod preference;

pub use brightness_input::{Direction, SegmentBar};
pub use control::{Control, ControlCommand, Level, SoundCatalog, SoundCatalogEntry, SoundId};
pub use preference::{PlayingStates, PreferenceField, PreferenceKey, PreferenceRecord};
