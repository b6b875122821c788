use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::interval;

use crate::core::aggregator::ResultAggregator;
use crate::core::status_share::RESULTS_QUEUE;
use crate::models::result::AggregateStats;

// 运行期间每秒对外推一份快照
// 停止信号跟着本次运行走, 上一轮的任务不会把旧快照推进下一轮
pub async fn share_results_periodically(
    test_start: Instant,
    aggregator: Arc<Mutex<ResultAggregator>>,
    mut stop: watch::Receiver<bool>,
) {
    let mut interval = interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
        let elapsed = (Instant::now() - test_start).as_secs_f64();
        let stats = aggregator.lock().snapshot(elapsed);
        push_snapshot(stats);
    }
}

// 队列只留最新一份, 消费者拿到的永远是最近一次采样
pub(crate) fn push_snapshot(stats: AggregateStats) {
    let mut queue = RESULTS_QUEUE.lock();
    if !queue.is_empty() {
        queue.pop_front();
    }
    queue.push_back(stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status_check::default_checks;
    use crate::models::request_result::RequestResult;

    #[test]
    fn queue_keeps_only_latest_snapshot() {
        RESULTS_QUEUE.lock().clear();
        let mut aggregator = ResultAggregator::new(default_checks());
        for round in 1..=3u64 {
            aggregator.record(&RequestResult {
                status_code: 200,
                latency_ms: round,
                network_error: false,
                body_bytes: 0,
                error_msg: None,
            });
            push_snapshot(aggregator.snapshot(round as f64));
        }
        let queue = RESULTS_QUEUE.lock();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.front().unwrap().total_requests, 3);
    }
}
