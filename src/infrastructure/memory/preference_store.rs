//! In-Memory Preference Store Implementation
//!
//! 与 sled 实现共用存储编码，支持读写故障注入

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::ports::{PreferenceStorePort, StoreError};
use crate::domain::preference::codec;
use crate::domain::{PreferenceField, PreferenceKey, PreferenceRecord};

/// 内存偏好存储
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    /// storage_key -> 编码后的字符串
    values: DashMap<&'static str, String>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 直接写入原始字符串（模拟旧版本或损坏的数据）
    pub fn insert_raw(&self, key: PreferenceKey, raw: impl Into<String>) {
        self.values.insert(key.storage_key(), raw.into());
    }

    pub fn raw(&self, key: PreferenceKey) -> Option<String> {
        self.values.get(key.storage_key()).map(|v| v.clone())
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl PreferenceStorePort for InMemoryPreferenceStore {
    async fn load(&self) -> PreferenceRecord {
        let mut record = PreferenceRecord::defaults();
        if self.fail_reads.load(Ordering::Relaxed) {
            tracing::warn!("Preference read failed, using defaults");
            return record;
        }

        for key in PreferenceKey::ALL {
            let Some(raw) = self.raw(key) else { continue };
            match codec::decode(key, &raw) {
                Ok(field) => record.apply(field),
                Err(e) => tracing::warn!(key = %key, error = %e, "Ignoring corrupt preference"),
            }
        }
        record
    }

    async fn save_field(&self, field: PreferenceField) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::WriteFailed(format!(
                "{}: injected failure",
                field.key()
            )));
        }
        self.values
            .insert(field.key().storage_key(), codec::encode(&field));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;

    #[tokio::test]
    async fn test_empty_store_yields_defaults() {
        let store = InMemoryPreferenceStore::new();
        assert_eq!(store.load().await, PreferenceRecord::defaults());
    }

    #[tokio::test]
    async fn test_corrupt_key_falls_back_per_key() {
        let store = InMemoryPreferenceStore::new();
        store.insert_raw(PreferenceKey::Brightness, "not-a-number");
        store.insert_raw(PreferenceKey::NoiseSuppression, "0.3");

        let record = store.load().await;
        assert_eq!(record.brightness, Level::DEFAULT);
        assert_eq!(record.noise_suppression.value(), 30);
    }

    #[tokio::test]
    async fn test_read_failure_is_masked() {
        let store = InMemoryPreferenceStore::new();
        store
            .save_field(PreferenceField::Brightness(Level::clamped(90)))
            .await
            .unwrap();
        store.fail_reads(true);
        assert_eq!(store.load().await, PreferenceRecord::defaults());
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let store = InMemoryPreferenceStore::new();
        store.fail_writes(true);
        let result = store
            .save_field(PreferenceField::Brightness(Level::clamped(90)))
            .await;
        assert!(matches!(result, Err(StoreError::WriteFailed(_))));
        assert_eq!(store.raw(PreferenceKey::Brightness), None);
    }
}
