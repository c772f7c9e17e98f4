//! Sound Catalog - 舒缓音效目录
//!
//! 固定的只读数据，运行时不修改

use serde::{Deserialize, Serialize};

/// 音效唯一标识（目录 id，同时作为线上 `sound` 字段）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(String);

impl SoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SoundId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// 目录条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoundCatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
}

impl SoundCatalogEntry {
    pub fn sound_id(&self) -> SoundId {
        SoundId::new(self.id)
    }
}

const CATALOG: &[SoundCatalogEntry] = &[
    SoundCatalogEntry { id: "1", name: "White Noise" },
    SoundCatalogEntry { id: "2", name: "Ocean Waves" },
    SoundCatalogEntry { id: "3", name: "Gentle Rain" },
    SoundCatalogEntry { id: "4", name: "Brown Noise" },
    SoundCatalogEntry { id: "5", name: "Sunday Sunshine" },
    SoundCatalogEntry { id: "6", name: "Calming Crickets" },
    SoundCatalogEntry { id: "7", name: "Forest Wind" },
    SoundCatalogEntry { id: "8", name: "Fireplace Crackle" },
    SoundCatalogEntry { id: "9", name: "Soft Piano" },
];

/// 音效目录
pub struct SoundCatalog;

impl SoundCatalog {
    /// 全部条目，按展示顺序
    pub fn all() -> &'static [SoundCatalogEntry] {
        CATALOG
    }

    pub fn find(id: &SoundId) -> Option<&'static SoundCatalogEntry> {
        CATALOG.iter().find(|entry| entry.id == id.as_str())
    }

    /// 按展示名查找（不区分大小写）
    pub fn find_by_name(name: &str) -> Option<&'static SoundCatalogEntry> {
        CATALOG
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn contains(id: &SoundId) -> bool {
        Self::find(id).is_some()
    }

    /// 目录中的位置，用于稳定排序
    pub fn position(id: &SoundId) -> Option<usize> {
        CATALOG.iter().position(|entry| entry.id == id.as_str())
    }
}
