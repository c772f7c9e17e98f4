//! Preference Record - 用户偏好快照

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::control::{Level, SoundCatalog, SoundId};

/// 偏好键（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    Brightness,
    NoiseSuppression,
    PlayingStates,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 3] = [
        PreferenceKey::Brightness,
        PreferenceKey::NoiseSuppression,
        PreferenceKey::PlayingStates,
    ];

    /// 持久化存储中的键名
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness_value",
            Self::NoiseSuppression => "noise_suppression_value",
            Self::PlayingStates => "playing_states",
        }
    }
}

impl std::fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// 每个音效的播放标志
///
/// 缺失的键表示未播放；各标志相互独立
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayingStates(BTreeMap<SoundId, bool>);

impl PlayingStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self, sound: &SoundId) -> bool {
        self.0.get(sound).copied().unwrap_or(false)
    }

    pub fn set(&mut self, sound: SoundId, playing: bool) {
        self.0.insert(sound, playing);
    }

    /// 翻转标志，返回新状态
    pub fn toggle(&mut self, sound: &SoundId) -> bool {
        let playing = !self.is_playing(sound);
        self.set(sound.clone(), playing);
        playing
    }

    /// 除 `keep` 以外全部置为未播放
    pub fn clear_except(&mut self, keep: &SoundId) {
        for (sound, playing) in self.0.iter_mut() {
            if sound != keep {
                *playing = false;
            }
        }
    }

    pub fn clear(&mut self) {
        for playing in self.0.values_mut() {
            *playing = false;
        }
    }

    /// 正在播放的音效，按目录顺序（目录外的排在最后）
    pub fn playing(&self) -> Vec<SoundId> {
        let mut ids: Vec<SoundId> = self
            .0
            .iter()
            .filter(|(_, playing)| **playing)
            .map(|(sound, _)| sound.clone())
            .collect();
        ids.sort_by_key(|id| SoundCatalog::position(id).unwrap_or(usize::MAX));
        ids
    }

    pub fn any_playing(&self) -> bool {
        self.0.values().any(|playing| *playing)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 偏好快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub brightness: Level,
    pub noise_suppression: Level,
    pub playing_states: PlayingStates,
}

impl PreferenceRecord {
    /// 缺省值：亮度 50，降噪 50，无播放
    pub fn defaults() -> Self {
        Self::default()
    }

    /// 写入一个字段
    pub fn apply(&mut self, field: PreferenceField) {
        match field {
            PreferenceField::Brightness(level) => self.brightness = level,
            PreferenceField::NoiseSuppression(level) => self.noise_suppression = level,
            PreferenceField::PlayingStates(states) => self.playing_states = states,
        }
    }
}

/// 单个偏好字段（键 + 值）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceField {
    Brightness(Level),
    NoiseSuppression(Level),
    PlayingStates(PlayingStates),
}

impl PreferenceField {
    pub fn key(&self) -> PreferenceKey {
        match self {
            Self::Brightness(_) => PreferenceKey::Brightness,
            Self::NoiseSuppression(_) => PreferenceKey::NoiseSuppression,
            Self::PlayingStates(_) => PreferenceKey::PlayingStates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = PreferenceRecord::defaults();
        assert_eq!(record.brightness.value(), 50);
        assert_eq!(record.noise_suppression.value(), 50);
        assert!(record.playing_states.is_empty());
    }

    #[test]
    fn test_independent_flags() {
        let mut states = PlayingStates::new();
        let ocean = SoundId::new("2");
        let white = SoundId::new("1");

        assert!(states.toggle(&ocean));
        assert!(states.toggle(&white));
        assert!(states.is_playing(&ocean));
        assert!(states.is_playing(&white));
        assert_eq!(states.playing(), vec![white.clone(), ocean.clone()]);

        states.clear_except(&ocean);
        assert!(!states.is_playing(&white));
        assert!(states.is_playing(&ocean));
        assert!(!states.is_playing(&SoundId::new("9")));
    }

    #[test]
    fn test_apply_field() {
        let mut record = PreferenceRecord::defaults();
        record.apply(PreferenceField::Brightness(Level::clamped(73)));
        assert_eq!(record.brightness.value(), 73);
        assert_eq!(record.noise_suppression, Level::DEFAULT);
        assert_eq!(
            PreferenceField::Brightness(Level::clamped(73)).key(),
            PreferenceKey::Brightness
        );
    }
}
