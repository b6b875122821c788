use anyhow::{anyhow, Context, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// 阈值作用的指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricKind {
    Median,
    P95,
    P99,
    Max,
    Min,
    FailureRate,
    Rps,
}

// 比较算子
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl CompareOp {
    pub fn apply(&self, observed: f64, bound: f64) -> bool {
        match self {
            CompareOp::Lt => observed < bound,
            CompareOp::Le => observed <= bound,
            CompareOp::Gt => observed > bound,
            CompareOp::Ge => observed >= bound,
            CompareOp::Eq => observed == bound,
        }
    }
}

// 一条阈值规则, 如p95<500或rate<0.01
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub expr: String,
    pub metric: MetricKind,
    pub op: CompareOp,
    pub bound: f64,
}

impl FromStr for ThresholdRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // 双字符算子必须先于单字符匹配
        let (op_str, op) = if s.contains("<=") {
            ("<=", CompareOp::Le)
        } else if s.contains(">=") {
            (">=", CompareOp::Ge)
        } else if s.contains("==") {
            ("==", CompareOp::Eq)
        } else if s.contains('<') {
            ("<", CompareOp::Lt)
        } else if s.contains('>') {
            (">", CompareOp::Gt)
        } else {
            return Err(anyhow!("阈值缺少比较算子(<,<=,>,>=,==): {}", s));
        };
        let (metric_str, bound_str) = s
            .split_once(op_str)
            .ok_or_else(|| anyhow!("阈值格式错误: {}", s))?;
        let metric = match metric_str.trim() {
            "med" | "p50" => MetricKind::Median,
            "p95" => MetricKind::P95,
            "p99" => MetricKind::P99,
            "max" => MetricKind::Max,
            "min" => MetricKind::Min,
            "rate" => MetricKind::FailureRate,
            "rps" => MetricKind::Rps,
            other => return Err(anyhow!("未知的阈值指标: {}", other)),
        };
        let bound: f64 = bound_str
            .trim()
            .parse()
            .with_context(|| format!("阈值界限不是数字: {}", bound_str.trim()))?;
        Ok(ThresholdRule {
            expr: s.to_string(),
            metric,
            op,
            bound,
        })
    }
}
