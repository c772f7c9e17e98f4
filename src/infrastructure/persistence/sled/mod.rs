//! Sled 偏好存储

mod preference_store;

pub use preference_store::{SledPreferenceConfig, SledPreferenceStore};
