use crate::models::stage::Stage;
use crate::models::status_check::StatusCheck;
use crate::models::threshold_rule::ThresholdRule;

// 一次压测运行的全部输入
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub stages: Vec<Stage>,
    pub thresholds: Vec<ThresholdRule>,
    pub checks: Vec<StatusCheck>,
    pub timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub pacing_ms: u64,
    pub verbose: bool,
}
