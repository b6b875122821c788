use anyhow::anyhow;
use std::time::Duration;

use crate::models::run_config::RunConfig;

// 开跑前把配置过一遍, 有问题直接拦下, 不让任何虚拟用户起来
pub(crate) fn check_run_config(config: &RunConfig) -> anyhow::Result<()> {
    if config.url.is_empty() {
        return Err(anyhow!("目标地址不能为空"));
    }
    if let Err(e) = config.url.parse::<reqwest::Url>() {
        return Err(anyhow!("目标地址不合法: {}", e));
    }
    if config.username.is_empty() {
        return Err(anyhow!("basic认证用户名不能为空"));
    }
    if config.password.is_empty() {
        return Err(anyhow!("basic认证密码不能为空"));
    }
    if config.stages.is_empty() {
        return Err(anyhow!("至少要有一个阶梯"));
    }
    for (index, stage) in config.stages.iter().enumerate() {
        if stage.duration == Duration::ZERO {
            return Err(anyhow!("第{}段时长必须大于0", index + 1));
        }
    }
    if config.tick_interval_ms == 0 {
        return Err(anyhow!("步进间隔必须大于0"));
    }
    Ok(())
}
