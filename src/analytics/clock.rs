//! Wall-clock source for period resolution

use chrono::{DateTime, FixedOffset, Local};

/// 当前时间提供者
///
/// 返回带偏移量的本地时间，period 边界按该偏移量所在的时区计算。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// 系统本地时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// 固定时钟，测试和 CLI `--now` 使用
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
