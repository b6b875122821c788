use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use futures::future::join_all;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::core::virtual_user::VirtualUser;
use crate::models::request_result::RequestResult;
use crate::models::run_config::RunConfig;
use crate::models::stage::Stage;

// 按经过时间在阶梯曲线上取目标并发数, 阶段内线性插值
// 第一阶段从0起步, 之后每段从上一段的目标起步, 曲线走完后停在最后一段的目标
pub fn target_at(stages: &[Stage], elapsed: Duration) -> u64 {
    let mut stage_start = Duration::ZERO;
    let mut prev_target: u64 = 0;
    for stage in stages {
        let stage_end = stage_start + stage.duration;
        if elapsed < stage_end {
            let in_stage = (elapsed - stage_start).as_secs_f64();
            let span = stage.duration.as_secs_f64();
            let from = prev_target as f64;
            let to = stage.target as f64;
            return (from + (to - from) * (in_stage / span)).round() as u64;
        }
        stage_start = stage_end;
        prev_target = stage.target;
    }
    // 比一个步进还短的阶段走到这里, 按段尾目标钳制而不是跳过
    prev_target
}

// 一个在册虚拟用户: 摘牌标记加任务句柄
struct VuHandle {
    stop_flag: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

// 调度器是存活用户数的唯一写者, 每个步进把在册人数对齐到插值目标
pub struct RampScheduler {
    config: RunConfig,
    headers: HeaderMap,
    result_tx: UnboundedSender<RequestResult>,
    live: Vec<VuHandle>,
    retired: Vec<JoinHandle<()>>,
    next_vu_id: u64,
}

impl RampScheduler {
    pub fn new(
        config: RunConfig,
        headers: HeaderMap,
        result_tx: UnboundedSender<RequestResult>,
    ) -> Self {
        RampScheduler {
            config,
            headers,
            result_tx,
            live: Vec::new(),
            retired: Vec::new(),
            // 虚拟用户编号从1开始
            next_vu_id: 1,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let total: Duration = self.config.stages.iter().map(|s| s.duration).sum();
        let start = Instant::now();
        let mut ticker = interval(Duration::from_millis(self.config.tick_interval_ms));
        let mut spawn_error = None;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
            let elapsed = start.elapsed();
            if elapsed >= total {
                break;
            }
            let target = target_at(&self.config.stages, elapsed);
            // 扩编失败也要走完整收尾, 在途用户不能没人摘牌
            if let Err(e) = self.resize_to(target) {
                spawn_error = Some(e);
                break;
            }
        }
        // 曲线走完或被打断, 所有人收尾, 在途请求做完才算结束
        self.stop_all();
        let mut handles = std::mem::take(&mut self.retired);
        handles.extend(self.live.drain(..).map(|vu| vu.handle));
        join_all(handles).await;
        match spawn_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn stop_all(&self) {
        for vu in &self.live {
            vu.stop_flag.store(true, Ordering::Relaxed);
        }
    }

    fn resize_to(&mut self, target: u64) -> anyhow::Result<()> {
        let target = target as usize;
        // 缺人就补新用户, 编号永远用没发过的
        while self.live.len() < target {
            let vu = self.spawn_vu()?;
            self.live.push(vu);
        }
        // 超编就后进先出摘牌
        while self.live.len() > target {
            if let Some(vu) = self.live.pop() {
                vu.stop_flag.store(true, Ordering::Relaxed);
                self.retired.push(vu.handle);
            }
        }
        Ok(())
    }

    fn spawn_vu(&mut self) -> anyhow::Result<VuHandle> {
        // 构建http客户端
        let client_builder = Client::builder();
        // 如果传入了超时时间, 客户端添加超时时间
        let client = if self.config.timeout_secs > 0 {
            client_builder
                .timeout(Duration::from_secs(self.config.timeout_secs))
                .build()
                .context("构建带超时的http客户端失败")?
        } else {
            client_builder.build().context("构建http客户端失败")?
        };
        let stop_flag = Arc::new(AtomicBool::new(false));
        let vu = VirtualUser {
            id: self.next_vu_id,
            client,
            url: self.config.url.clone(),
            headers: self.headers.clone(),
            pacing_ms: self.config.pacing_ms,
            verbose: self.config.verbose,
            stop_flag: stop_flag.clone(),
            result_tx: self.result_tx.clone(),
        };
        self.next_vu_id += 1;
        let handle = tokio::spawn(vu.run());
        Ok(VuHandle { stop_flag, handle })
    }
}
