use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::clock::SystemClock;
use crate::core::order_generator::generate_order;
use crate::models::request_result::RequestResult;

// 单个虚拟用户: 不停下单, 直到被调度器摘牌
pub(crate) struct VirtualUser {
    pub(crate) id: u64,
    pub(crate) client: Client,
    pub(crate) url: String,
    pub(crate) headers: HeaderMap,
    pub(crate) pacing_ms: u64,
    pub(crate) verbose: bool,
    pub(crate) stop_flag: Arc<AtomicBool>,
    pub(crate) result_tx: UnboundedSender<RequestResult>,
}

impl VirtualUser {
    pub(crate) async fn run(self) {
        let clock = SystemClock;
        let mut iteration: u64 = 0;
        // 停止标记只在迭代边界检查, 在途请求做完再退出
        while !self.stop_flag.load(Ordering::Relaxed) {
            let order = generate_order(self.id, iteration, &clock);
            // 记录当前请求开始时间
            let start = Instant::now();
            let request = self
                .client
                .post(&self.url)
                .headers(self.headers.clone())
                .json(&order);
            // 开始发送请求
            let result = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    // 响应体读完连接才能复用, 大小也从这里来
                    match response.bytes().await {
                        Ok(bytes) => {
                            let latency_ms = start.elapsed().as_millis() as u64;
                            // 如果需要打印详细日志
                            if self.verbose {
                                let buffer = String::from_utf8_lossy(&bytes).to_string();
                                println!("{:+?}", buffer);
                            }
                            let error_msg = if status.is_client_error() || status.is_server_error()
                            {
                                Some(status.canonical_reason().unwrap_or("未知状态").to_string())
                            } else {
                                None
                            };
                            RequestResult {
                                status_code: status.as_u16(),
                                latency_ms,
                                network_error: false,
                                body_bytes: bytes.len() as u64,
                                error_msg,
                            }
                        }
                        // 响应头到了但响应体断了, 按网络错误算
                        Err(e) => RequestResult {
                            status_code: 0,
                            latency_ms: start.elapsed().as_millis() as u64,
                            network_error: true,
                            body_bytes: 0,
                            error_msg: Some(e.to_string()),
                        },
                    }
                }
                // 请求失败, 如果有状态码就记录, 没有记0
                Err(e) => {
                    let latency_ms = start.elapsed().as_millis() as u64;
                    let status_code = match e.status() {
                        None => 0,
                        Some(code) => u16::from(code),
                    };
                    RequestResult {
                        status_code,
                        latency_ms,
                        network_error: status_code == 0,
                        body_bytes: 0,
                        error_msg: Some(e.to_string()),
                    }
                }
            };
            // 收集端已经关闭说明整体在收尾, 直接退出
            if self.result_tx.send(result).is_err() {
                break;
            }
            iteration += 1;
            if self.pacing_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.pacing_ms)).await;
            }
        }
    }
}
