use std::collections::HashMap;

// 单个命名检查的通过/失败计数
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq)]
pub struct CheckStat {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

// 聚合后的压测指标快照
#[derive(Debug)]
#[derive(Clone)]
pub struct AggregateStats {
    pub total_duration: f64,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub median_response_time: u64,
    pub response_time_95: u64,
    pub response_time_99: u64,
    pub total_requests: u64,
    pub rps: f64,
    pub max_response_time: u64,
    pub min_response_time: u64,
    pub err_count: u64,
    pub total_data_kb: f64,
    pub throughput_per_second_kb: f64,
    pub checks: Vec<CheckStat>,
    pub http_errors: HashMap<(u16, String), u32>,
    pub timestamp: u128,
}

// 单条阈值的评定结果
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq)]
pub struct ThresholdVerdict {
    pub expr: String,
    pub observed: f64,
    pub passed: bool,
}

// 整次运行的最终结果
#[derive(Debug)]
#[derive(Clone)]
pub struct TestResult {
    pub stats: AggregateStats,
    pub verdicts: Vec<ThresholdVerdict>,
    pub passed: bool,
}
