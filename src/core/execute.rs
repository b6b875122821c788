use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indicatif::ProgressBar;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tokio::sync::{mpsc, watch};
use tokio::time::interval;

use crate::core::aggregator::{collect_results, ResultAggregator};
use crate::core::check_run_config::check_run_config;
use crate::core::evaluate_thresholds::evaluate_thresholds;
use crate::core::ramp_scheduler::RampScheduler;
use crate::core::share_results_periodically::share_results_periodically;
use crate::models::result::TestResult;
use crate::models::run_config::RunConfig;

pub async fn run(config: RunConfig) -> anyhow::Result<TestResult> {
    // 配置有问题就地拦下, 不起任何虚拟用户
    check_run_config(&config)?;
    // basic认证凭据只算一次, 之后所有虚拟用户只读
    let credentials = STANDARD.encode(format!("{}:{}", config.username, config.password));
    // user_agent
    let info = os_info::get();
    let os_type = info.os_type();
    let os_version = info.version().to_string();
    let app_name = env!("CARGO_PKG_NAME");
    let app_version = env!("CARGO_PKG_VERSION");
    let user_agent_value = format!(
        "{} {} ({}; {})",
        app_name, app_version, os_type, os_version
    );
    // 构建请求头
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, format!("Basic {}", credentials).parse()?);
    headers.insert(USER_AGENT, user_agent_value.parse()?);

    // 汇总通道和唯一的收集任务
    let (result_tx, result_rx) = mpsc::unbounded_channel();
    let aggregator = Arc::new(Mutex::new(ResultAggregator::new(config.checks.clone())));
    let collector = tokio::spawn(collect_results(result_rx, aggregator.clone()));

    // 整条曲线的时长
    let schedule_total: Duration = config.stages.iter().map(|s| s.duration).sum();
    // 开始测试时间
    let test_start = Instant::now();
    // 测试结束时间
    let test_end = test_start + schedule_total;

    // 周期性对外共享快照, 停止信号只管这一次运行
    // todo: 做平台的话这里要加回调
    let (share_stop_tx, share_stop_rx) = watch::channel(false);
    let share_handle = {
        let aggregator_for_sharing = aggregator.clone();
        tokio::spawn(async move {
            share_results_periodically(test_start, aggregator_for_sharing, share_stop_rx).await;
        })
    };

    // 终止信号: 通知调度器收曲线, 在途请求做完再收尾
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        eprintln!("收到终止信号, 完成在途请求后收尾");
        let _ = shutdown_tx.send(true);
    });

    let verbose = config.verbose;
    let thresholds = config.thresholds.clone();
    let mut shutdown_for_progress = shutdown_rx.clone();
    let scheduler = RampScheduler::new(config, headers, result_tx.clone());
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    // 根据条件判断是否打印进度条, 和等待调度器完成
    let scheduler_result = match verbose {
        true => scheduler_handle.await.unwrap(),
        false => {
            let pb = ProgressBar::new(100);
            let progress_interval = Duration::from_millis(300);
            let mut interval = interval(progress_interval);
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = interval.tick() => {}
                        _ = shutdown_for_progress.changed() => break,
                    }
                    if Instant::now() >= test_end {
                        break;
                    }
                    let elapsed = Instant::now().duration_since(test_start).as_secs_f64();
                    let progress = (elapsed / schedule_total.as_secs_f64()) * 100.0;
                    pb.set_position(progress as u64);
                }
                pb.finish_and_clear();
            })
            .await
            .unwrap();
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_message("等待所有请求响应");
            let result = scheduler_handle.await.unwrap();
            bar.finish_with_message("");
            bar.finish();
            result
        }
    };

    // 发送端全部交回之后收集任务把通道排空自然退出
    drop(result_tx);
    collector.await.unwrap();
    // 共享任务停稳之后队列里不会再冒出本轮的快照
    let _ = share_stop_tx.send(true);
    share_handle.await.unwrap();
    scheduler_result?;

    // 计算返回数据
    let elapsed = test_start.elapsed().as_secs_f64();
    let stats = aggregator.lock().snapshot(elapsed);
    let verdicts = evaluate_thresholds(&stats, &thresholds);
    let passed = verdicts.iter().all(|v| v.passed);
    Ok(TestResult {
        stats,
        verdicts,
        passed,
    })
}

// 等ctrl_c或SIGTERM, 谁先来听谁的
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("监听ctrl_c信号失败");
    };
    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("监听终止信号失败")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
