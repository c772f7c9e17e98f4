//! Preference Codec - 偏好字段与存储字符串互转
//!
//! 写入统一使用整数百分比字符串（如 "73"）。
//! 读取兼容旧的分数写法：降噪值带小数点且在 0.0..=1.0 内视为分数（"0.5" -> 50）。

use thiserror::Error;

use super::record::{PlayingStates, PreferenceField, PreferenceKey};
use crate::domain::control::Level;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{key}: not a number: {raw:?}")]
    NotANumber { key: PreferenceKey, raw: String },

    #[error("{key}: invalid JSON: {reason}")]
    InvalidJson { key: PreferenceKey, reason: String },
}

/// 编码为存储字符串
pub fn encode(field: &PreferenceField) -> String {
    match field {
        PreferenceField::Brightness(level) | PreferenceField::NoiseSuppression(level) => {
            level.value().to_string()
        }
        // BTreeMap<SoundId, bool> 序列化不会失败
        PreferenceField::PlayingStates(states) => {
            serde_json::to_string(states).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// 从存储字符串解码
pub fn decode(key: PreferenceKey, raw: &str) -> Result<PreferenceField, DecodeError> {
    match key {
        PreferenceKey::Brightness => parse_number(key, raw)
            .map(Level::from_percent)
            .map(PreferenceField::Brightness),
        PreferenceKey::NoiseSuppression => {
            let value = parse_number(key, raw)?;
            let level = if raw.contains('.') && (0.0..=1.0).contains(&value) {
                Level::from_fraction(value)
            } else {
                Level::from_percent(value)
            };
            Ok(PreferenceField::NoiseSuppression(level))
        }
        PreferenceKey::PlayingStates => serde_json::from_str::<PlayingStates>(raw)
            .map(PreferenceField::PlayingStates)
            .map_err(|e| DecodeError::InvalidJson {
                key,
                reason: e.to_string(),
            }),
    }
}

fn parse_number(key: PreferenceKey, raw: &str) -> Result<f64, DecodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::NotANumber {
            key,
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::control::SoundId;

    #[test]
    fn test_encode_levels_as_integer_percent() {
        assert_eq!(encode(&PreferenceField::Brightness(Level::clamped(73))), "73");
        assert_eq!(encode(&PreferenceField::NoiseSuppression(Level::MAX)), "100");
    }

    #[test]
    fn test_decode_brightness() {
        assert_eq!(
            decode(PreferenceKey::Brightness, "73").unwrap(),
            PreferenceField::Brightness(Level::clamped(73))
        );
        // 旧版本会存浮点字符串
        assert_eq!(
            decode(PreferenceKey::Brightness, "72.6").unwrap(),
            PreferenceField::Brightness(Level::clamped(73))
        );
        assert_eq!(
            decode(PreferenceKey::Brightness, "140").unwrap(),
            PreferenceField::Brightness(Level::MAX)
        );
        assert!(decode(PreferenceKey::Brightness, "bright").is_err());
        assert!(decode(PreferenceKey::Brightness, "NaN").is_err());
    }

    #[test]
    fn test_decode_suppression_legacy_fraction() {
        assert_eq!(
            decode(PreferenceKey::NoiseSuppression, "0.5").unwrap(),
            PreferenceField::NoiseSuppression(Level::clamped(50))
        );
        assert_eq!(
            decode(PreferenceKey::NoiseSuppression, "1.0").unwrap(),
            PreferenceField::NoiseSuppression(Level::MAX)
        );
        assert_eq!(
            decode(PreferenceKey::NoiseSuppression, "1").unwrap(),
            PreferenceField::NoiseSuppression(Level::clamped(1))
        );
        assert_eq!(
            decode(PreferenceKey::NoiseSuppression, "30").unwrap(),
            PreferenceField::NoiseSuppression(Level::clamped(30))
        );
    }

    #[test]
    fn test_playing_states_json() {
        let mut states = PlayingStates::new();
        states.set(SoundId::new("2"), true);
        states.set(SoundId::new("1"), false);
        let field = PreferenceField::PlayingStates(states);

        let raw = encode(&field);
        assert_eq!(raw, r#"{"1":false,"2":true}"#);
        assert_eq!(decode(PreferenceKey::PlayingStates, &raw).unwrap(), field);
        assert!(decode(PreferenceKey::PlayingStates, "[1,2]").is_err());
    }
}
