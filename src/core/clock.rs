use std::time::{SystemTime, UNIX_EPOCH};

// 毫秒级时间源, 留出接缝便于测试注入固定时间
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u128;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("系统时间早于UNIX纪元")
            .as_millis()
    }
}

// 固定时间源
pub struct FixedClock(pub u128);

impl Clock for FixedClock {
    fn now_millis(&self) -> u128 {
        self.0
    }
}
