use std::collections::HashMap;
use std::sync::Arc;

use histogram::Histogram;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::clock::{Clock, SystemClock};
use crate::models::request_result::RequestResult;
use crate::models::result::{AggregateStats, CheckStat};
use crate::models::status_check::StatusCheck;

// 汇总所有虚拟用户的请求观测值, 查询时产出一致的快照
pub struct ResultAggregator {
    histogram: Histogram,
    checks: Vec<StatusCheck>,
    check_passes: Vec<u64>,
    check_fails: Vec<u64>,
    total_requests: u64,
    successful_requests: u64,
    err_count: u64,
    max_response_time: u64,
    min_response_time: u64,
    total_response_size: u64,
    http_errors: HashMap<(u16, String), u32>,
}

impl ResultAggregator {
    pub fn new(checks: Vec<StatusCheck>) -> Self {
        let check_count = checks.len();
        ResultAggregator {
            // 做数据统计
            histogram: Histogram::new(10, 20).unwrap(),
            checks,
            check_passes: vec![0; check_count],
            check_fails: vec![0; check_count],
            total_requests: 0,
            successful_requests: 0,
            err_count: 0,
            max_response_time: 0,
            min_response_time: u64::MAX,
            total_response_size: 0,
            http_errors: HashMap::new(),
        }
    }

    pub fn record(&mut self, result: &RequestResult) {
        // 总请求数+1
        self.total_requests += 1;
        // 每个命名检查计一次通过或失败
        for (index, check) in self.checks.iter().enumerate() {
            if check.passes(result.status_code) {
                self.check_passes[index] += 1;
            } else {
                self.check_fails[index] += 1;
            }
        }
        // 2xx和3xx算成功, 其余连同网络错误算失败
        let failed = result.network_error || !(200..400).contains(&result.status_code);
        if failed {
            self.err_count += 1;
            let message = result
                .error_msg
                .clone()
                .unwrap_or_else(|| "未知状态".to_string());
            *self
                .http_errors
                .entry((result.status_code, message))
                .or_insert(0) += 1;
        } else {
            self.successful_requests += 1;
            self.total_response_size += result.body_bytes;
        }
        // 响应时间不分成败都入桶
        self.max_response_time = self.max_response_time.max(result.latency_ms);
        self.min_response_time = self.min_response_time.min(result.latency_ms);
        match self.histogram.increment(result.latency_ms) {
            Ok(_) => {}
            Err(err) => eprintln!("错误:{}", err),
        }
    }

    pub fn snapshot(&self, total_duration: f64) -> AggregateStats {
        let total = self.total_requests;
        let (success_rate, failure_rate) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                self.successful_requests as f64 / total as f64 * 100.0,
                self.err_count as f64 / total as f64,
            )
        };
        let total_data_kb = self.total_response_size as f64 / 1024.0;
        let checks = self
            .checks
            .iter()
            .enumerate()
            .map(|(index, check)| CheckStat {
                name: check.name.clone(),
                passes: self.check_passes[index],
                fails: self.check_fails[index],
            })
            .collect();
        AggregateStats {
            total_duration,
            success_rate,
            failure_rate,
            median_response_time: self.percentile_start(50.0),
            response_time_95: self.percentile_start(95.0),
            response_time_99: self.percentile_start(99.0),
            total_requests: total,
            rps: self.successful_requests as f64 / total_duration,
            max_response_time: self.max_response_time,
            min_response_time: if total == 0 { 0 } else { self.min_response_time },
            err_count: self.err_count,
            total_data_kb,
            throughput_per_second_kb: total_data_kb / total_duration,
            checks,
            http_errors: self.http_errors.clone(),
            timestamp: SystemClock.now_millis(),
        }
    }

    fn percentile_start(&self, percentile: f64) -> u64 {
        match self.histogram.percentile(percentile) {
            Ok(bucket) => *bucket.range().start(),
            Err(_) => 0,
        }
    }
}

// 唯一的收集任务: 把通道里的观测值灌进聚合器, 通道关闭即退出
pub async fn collect_results(
    mut result_rx: UnboundedReceiver<RequestResult>,
    aggregator: Arc<Mutex<ResultAggregator>>,
) {
    while let Some(result) = result_rx.recv().await {
        aggregator.lock().record(&result);
    }
}
