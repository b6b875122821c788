use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

// 一个压测阶段: 在duration时间内把并发线性拉到target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub duration: Duration,
    pub target: u64,
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    // 形如"30s:50", 冒号前是时长, 冒号后是目标VU数
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ':');
        match (parts.next(), parts.next()) {
            (Some(d), Some(t)) => {
                let duration = parse_duration(d.trim())?;
                let target = t
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow!("无法解析目标VU数: {}", t))?;
                Ok(Stage { duration, target })
            }
            _ => Err(anyhow!("阶段格式错误, 应为'时长:目标VU数', 例如30s:50: {}", s)),
        }
    }
}

// 时长支持ms/s/m三种单位
pub(crate) fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    if let Some(v) = s.strip_suffix("ms") {
        let v = v.parse::<u64>().map_err(|_| anyhow!("无法解析时长: {}", s))?;
        return Ok(Duration::from_millis(v));
    }
    if let Some(v) = s.strip_suffix('s') {
        let v = v.parse::<u64>().map_err(|_| anyhow!("无法解析时长: {}", s))?;
        return Ok(Duration::from_secs(v));
    }
    if let Some(v) = s.strip_suffix('m') {
        let v = v.parse::<u64>().map_err(|_| anyhow!("无法解析时长: {}", s))?;
        return Ok(Duration::from_secs(v * 60));
    }
    Err(anyhow!("时长缺少单位(ms/s/m): {}", s))
}
