use crate::models::result::{AggregateStats, ThresholdVerdict};
use crate::models::threshold_rule::{MetricKind, ThresholdRule};

// 用最终快照对每条阈值求值, 同样的输入永远给同样的结论
pub fn evaluate_thresholds(
    stats: &AggregateStats,
    rules: &[ThresholdRule],
) -> Vec<ThresholdVerdict> {
    rules
        .iter()
        .map(|rule| {
            let observed = observed_metric(stats, rule.metric);
            ThresholdVerdict {
                expr: rule.expr.clone(),
                observed,
                passed: rule.op.apply(observed, rule.bound),
            }
        })
        .collect()
}

fn observed_metric(stats: &AggregateStats, metric: MetricKind) -> f64 {
    match metric {
        MetricKind::Median => stats.median_response_time as f64,
        MetricKind::P95 => stats.response_time_95 as f64,
        MetricKind::P99 => stats.response_time_99 as f64,
        MetricKind::Max => stats.max_response_time as f64,
        MetricKind::Min => stats.min_response_time as f64,
        MetricKind::FailureRate => stats.failure_rate,
        MetricKind::Rps => stats.rps,
    }
}
