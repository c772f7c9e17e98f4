//! Control Level - 规范化的控制量
//!
//! 设备边界上的唯一单位：整数百分比 0..=100

use serde::{Deserialize, Serialize};

/// 控制量（亮度 / 降噪强度 / 音量）
///
/// 不变量: 0 <= value <= 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(0);
    pub const MAX: Level = Level(100);
    /// 缺省值（亮度与降噪强度）
    pub const DEFAULT: Level = Level(50);

    /// 创建，超过 100 返回 None
    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    /// 从任意整数夹取
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// 从百分比浮点数（0.0..=100.0）转换，四舍五入并夹取
    pub fn from_percent(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::MIN;
        }
        Self(percent.round().clamp(0.0, 100.0) as u8)
    }

    /// 从滑块分数（0.0..=1.0）转换
    pub fn from_fraction(fraction: f64) -> Self {
        Self::from_percent(fraction * 100.0)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 转回 0.0..=1.0，供使用分数滑块的界面显示
    pub fn as_fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or_else(|| format!("level out of range: {}", value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
