//! Brightness Input - 分段亮度条的输入映射
//!
//! 竖直分段条：顶部为 max，底部为 min；填充段数从下往上计

use serde::{Deserialize, Serialize};

use crate::domain::control::Level;

/// 圆弧仪表占整圆的比例（270°）
const ARC_FRACTION: f64 = 0.75;

/// 方向输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// 分段亮度条几何与取值范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBar {
    pub segments: u32,
    pub segment_height: f64,
    pub gap: f64,
    pub min_percent: u8,
    pub max_percent: u8,
}

impl Default for SegmentBar {
    fn default() -> Self {
        Self {
            segments: 8,
            segment_height: 30.0,
            gap: 4.0,
            min_percent: 15,
            max_percent: 100,
        }
    }
}

impl SegmentBar {
    /// 总高度（含段间距）
    pub fn height(&self) -> f64 {
        self.segment_height * f64::from(self.segments)
            + self.gap * f64::from(self.segments.saturating_sub(1))
    }

    /// 条内纵坐标 -> 亮度
    pub fn level_at(&self, local_y: f64) -> Level {
        let height = self.height();
        if height <= 0.0 || local_y.is_nan() {
            return Level::clamped(i64::from(self.max_percent));
        }
        let y = local_y.clamp(0.0, height);
        let range = f64::from(self.max_percent) - f64::from(self.min_percent);
        Level::from_percent(f64::from(self.max_percent) - (y / height * range).round())
    }

    /// 亮度对应的填充段数
    pub fn filled_segments(&self, level: Level) -> u32 {
        (f64::from(level.value()) / 100.0 * f64::from(self.segments)).round() as u32
    }

    /// 按方向移动一段，结果夹取到 [min, max]
    pub fn nudge(&self, level: Level, direction: Direction) -> Level {
        if self.segments == 0 {
            return level;
        }
        let filled = self.filled_segments(level);
        let next = match direction {
            Direction::Up => (filled + 1).min(self.segments),
            Direction::Down => filled.saturating_sub(1),
        };
        let percent = (f64::from(next) * 100.0 / f64::from(self.segments)).round();
        let clamped = percent.clamp(f64::from(self.min_percent), f64::from(self.max_percent));
        Level::from_percent(clamped)
    }

    /// 圆弧仪表填充比例（相对整圆）
    pub fn arc_fraction(&self, level: Level) -> f64 {
        level.as_fraction() * ARC_FRACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_includes_gaps() {
        assert_eq!(SegmentBar::default().height(), 268.0);
    }

    #[test]
    fn test_level_at_maps_top_to_max_and_bottom_to_min() {
        let bar = SegmentBar::default();
        assert_eq!(bar.level_at(0.0).value(), 100);
        assert_eq!(bar.level_at(268.0).value(), 15);
        assert_eq!(bar.level_at(-40.0).value(), 100);
        assert_eq!(bar.level_at(900.0).value(), 15);
        // 中点: 100 - round(0.5 * 85) = 100 - 43
        assert_eq!(bar.level_at(134.0).value(), 57);
    }

    #[test]
    fn test_filled_segments() {
        let bar = SegmentBar::default();
        assert_eq!(bar.filled_segments(Level::MIN), 0);
        assert_eq!(bar.filled_segments(Level::clamped(50)), 4);
        assert_eq!(bar.filled_segments(Level::MAX), 8);
    }

    #[test]
    fn test_nudge_moves_one_segment_within_range() {
        let bar = SegmentBar::default();
        assert_eq!(bar.nudge(Level::clamped(50), Direction::Up).value(), 63);
        assert_eq!(bar.nudge(Level::clamped(50), Direction::Down).value(), 38);
        assert_eq!(bar.nudge(Level::MAX, Direction::Up), Level::MAX);
        assert_eq!(bar.nudge(Level::clamped(15), Direction::Down).value(), 15);
    }

    #[test]
    fn test_arc_fraction() {
        let bar = SegmentBar::default();
        assert!((bar.arc_fraction(Level::MAX) - 0.75).abs() < f64::EPSILON);
        assert_eq!(bar.arc_fraction(Level::MIN), 0.0);
    }
}
