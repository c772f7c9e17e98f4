//! Sled-based Preference Store Implementation
//!
//! 键名与存储格式:
//! - `brightness_value`        整数百分比字符串
//! - `noise_suppression_value` 整数百分比字符串（兼容旧的 0.0..1.0 分数）
//! - `playing_states`          JSON 对象 soundId -> bool

use async_trait::async_trait;
use dashmap::DashMap;
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{PreferenceStorePort, StoreError};
use crate::domain::preference::codec;
use crate::domain::{PreferenceField, PreferenceKey, PreferenceRecord};

/// Sled 偏好存储配置
#[derive(Debug, Clone)]
pub struct SledPreferenceConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledPreferenceConfig {
    fn default() -> Self {
        Self {
            db_path: "data/preferences.sled".to_string(),
        }
    }
}

/// Sled 偏好存储
pub struct SledPreferenceStore {
    db: Db,
    /// 同键写入串行化，保证按完成顺序后写者胜
    key_locks: DashMap<PreferenceKey, Arc<Mutex<()>>>,
}

impl SledPreferenceStore {
    /// 创建新的存储实例
    pub fn new(config: &SledPreferenceConfig) -> Result<Self, StoreError> {
        let db = sled::open(&config.db_path).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            recovered = db.was_recovered(),
            "SledPreferenceStore initialized"
        );

        Ok(Self {
            db,
            key_locks: DashMap::new(),
        })
    }

    /// 打开现有存储
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let config = SledPreferenceConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn key_lock(&self, key: PreferenceKey) -> Arc<Mutex<()>> {
        self.key_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn read_raw(&self, key: PreferenceKey) -> Result<Option<String>, StoreError> {
        match self.db.get(key.storage_key()) {
            Ok(Some(bytes)) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| StoreError::ReadFailed(e.to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::ReadFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl PreferenceStorePort for SledPreferenceStore {
    async fn load(&self) -> PreferenceRecord {
        let mut record = PreferenceRecord::defaults();

        for key in PreferenceKey::ALL {
            match self.read_raw(key) {
                Ok(Some(raw)) => match codec::decode(key, &raw) {
                    Ok(field) => record.apply(field),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Ignoring corrupt preference")
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Preference read failed, using default")
                }
            }
        }

        tracing::debug!(?record, "Preferences loaded");
        record
    }

    async fn save_field(&self, field: PreferenceField) -> Result<(), StoreError> {
        let key = field.key();
        let raw = codec::encode(&field);

        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        self.db
            .insert(key.storage_key(), raw.as_bytes())
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(key = %key, value = %raw, "Preference saved");
        Ok(())
    }
}
