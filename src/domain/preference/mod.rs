//! Preference Context - 本地偏好

pub mod codec;
mod record;

pub use codec::DecodeError;
pub use record::{PlayingStates, PreferenceField, PreferenceKey, PreferenceRecord};
