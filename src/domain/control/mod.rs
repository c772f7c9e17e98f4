//! Control Context - 设备控制领域对象

mod command;
mod level;
mod sound;

pub use command::{Control, ControlCommand};
pub use level::Level;
pub use sound::{SoundCatalog, SoundCatalogEntry, SoundId};
