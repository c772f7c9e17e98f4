//! In-Memory Implementations

mod preference_store;

pub use preference_store::InMemoryPreferenceStore;
