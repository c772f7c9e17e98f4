//! Control Sequencer - 按逻辑先后判定结果是否过期
//!
//! 每个控制项一个单调递增的代数。用户每次设值领取一张票，
//! 只有持有最新票的结果才允许落到快照、存储和通知上；
//! 响应到达的先后顺序不参与判定。

use dashmap::DashMap;

use crate::domain::Control;

/// 一次设值的序号凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub control: Control,
    pub generation: u64,
}

/// 控制项序号器
#[derive(Debug, Default)]
pub struct ControlSequencer {
    generations: DashMap<Control, u64>,
}

impl ControlSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取新票，之前的票全部过期
    pub fn issue(&self, control: Control) -> Ticket {
        let mut generation = self.generations.entry(control).or_insert(0);
        *generation += 1;
        Ticket {
            control,
            generation: *generation,
        }
    }

    /// 是否仍是该控制项的最新票
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations
            .get(&ticket.control)
            .map(|generation| *generation == ticket.generation)
            .unwrap_or(false)
    }

    pub fn latest(&self, control: Control) -> u64 {
        self.generations.get(&control).map(|g| *g).unwrap_or(0)
    }
}
