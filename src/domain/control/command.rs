//! Control Command - 发往设备的控制命令
//!
//! 命令只携带目标值（不是增量），因此是幂等的

use serde::{Deserialize, Serialize};

use super::level::Level;
use super::sound::SoundId;

/// 设备控制命令
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ControlCommand {
    SetBrightness { level: Level },
    SetNoiseSuppression { level: Level },
    PlaySound { sound: SoundId, volume: Level },
    StopSound,
    GetStatus,
}

impl ControlCommand {
    /// 命令作用的控制项
    pub fn control(&self) -> Control {
        match self {
            Self::SetBrightness { .. } => Control::Brightness,
            Self::SetNoiseSuppression { .. } => Control::NoiseSuppression,
            Self::PlaySound { .. } | Self::StopSound => Control::Sound,
            Self::GetStatus => Control::Status,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetBrightness { .. } => "set_brightness",
            Self::SetNoiseSuppression { .. } => "set_noise_suppression",
            Self::PlaySound { .. } => "play_sound",
            Self::StopSound => "stop_sound",
            Self::GetStatus => "get_status",
        }
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetBrightness { level } => write!(f, "set_brightness({})", level),
            Self::SetNoiseSuppression { level } => write!(f, "set_noise_suppression({})", level),
            Self::PlaySound { sound, volume } => write!(f, "play_sound({}, {})", sound, volume),
            Self::StopSound => write!(f, "stop_sound"),
            Self::GetStatus => write!(f, "get_status"),
        }
    }
}

/// 控制项
///
/// 同一控制项的命令互相覆盖，不同控制项互不影响
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Brightness,
    NoiseSuppression,
    Sound,
    Status,
}

impl Control {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::NoiseSuppression => "noise_suppression",
            Self::Sound => "sound",
            Self::Status => "status",
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mapping() {
        let play = ControlCommand::PlaySound {
            sound: SoundId::new("2"),
            volume: Level::DEFAULT,
        };
        assert_eq!(play.control(), Control::Sound);
        assert_eq!(ControlCommand::StopSound.control(), Control::Sound);
        assert_eq!(ControlCommand::GetStatus.control(), Control::Status);
        assert_eq!(play.to_string(), "play_sound(2, 50)");
    }

    #[test]
    fn test_same_payload_is_equal() {
        let a = ControlCommand::SetBrightness { level: Level::clamped(50) };
        let b = ControlCommand::SetBrightness { level: Level::clamped(50) };
        assert_eq!(a, b);
    }
}
