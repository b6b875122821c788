// 单次请求的观测值, 走通道汇入聚合器
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResult {
    pub status_code: u16,
    pub latency_ms: u64,
    pub network_error: bool,
    pub body_bytes: u64,
    pub error_msg: Option<String>,
}
