use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::sync::{mpsc, watch};
use wiremock::matchers::{basic_auth, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stage_bomb_engine::core::execute;
use stage_bomb_engine::core::ramp_scheduler::RampScheduler;
use stage_bomb_engine::models::order::Order;
use stage_bomb_engine::models::run_config::RunConfig;
use stage_bomb_engine::models::stage::Stage;
use stage_bomb_engine::models::status_check::default_checks;
use stage_bomb_engine::models::threshold_rule::ThresholdRule;

fn parse_stages(exprs: &[&str]) -> Vec<Stage> {
    exprs.iter().map(|s| s.parse().unwrap()).collect()
}

fn parse_thresholds(exprs: &[&str]) -> Vec<ThresholdRule> {
    exprs.iter().map(|s| s.parse().unwrap()).collect()
}

// 半秒钟的迷你曲线, 跑真实的调度器和虚拟用户
fn short_config(url: String) -> RunConfig {
    RunConfig {
        url,
        username: "perf".to_string(),
        password: "secret".to_string(),
        stages: parse_stages(&["300ms:4", "200ms:0"]),
        thresholds: parse_thresholds(&["p95<5000", "rate<0.01"]),
        checks: default_checks(),
        timeout_secs: 5,
        tick_interval_ms: 50,
        pacing_ms: 0,
        verbose: false,
    }
}

#[tokio::test]
async fn healthy_target_passes_and_sends_wire_format() {
    let mock_server = MockServer::start().await;
    // 严格匹配: 方法, 路径, 内容类型, basic认证, user_agent缺一不可
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(header("content-type", "application/json"))
        .and(basic_auth("perf", "secret"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("created"))
        .mount(&mock_server)
        .await;

    let config = short_config(format!("{}/api/orders", mock_server.uri()));
    let result = execute::run(config).await.unwrap();

    assert!(result.passed, "{:?}", result.verdicts);
    assert!(result.stats.total_requests > 0);
    assert_eq!(result.stats.err_count, 0);
    let check_200 = result
        .stats
        .checks
        .iter()
        .find(|c| c.name == "200 OK")
        .unwrap();
    assert_eq!(check_200.fails, 0);
    assert_eq!(check_200.passes, result.stats.total_requests);

    // 发出去的载荷必须是约定的下单格式
    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    let order: Order = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(order.title.starts_with("Title "));
    assert_eq!(order.description, "Some description ");
    assert!(order.author.name.starts_with("John "));
    assert!(order.author.surname.starts_with("Doe "));
    assert!(order.date.ends_with(".08.2025 00:00:00"));
}

#[tokio::test]
async fn unauthorized_target_fails_the_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&mock_server)
        .await;

    let config = short_config(format!("{}/api/orders", mock_server.uri()));
    let result = execute::run(config).await.unwrap();

    assert!(!result.passed);
    assert_eq!(result.stats.err_count, result.stats.total_requests);
    assert_eq!(result.stats.success_rate, 0.0);
    let check_401 = result
        .stats
        .checks
        .iter()
        .find(|c| c.name == "401 Unauthorized")
        .unwrap();
    assert_eq!(check_401.fails, result.stats.total_requests);
    // 失败原因按状态码归档
    assert!(result.stats.http_errors.keys().any(|(code, _)| *code == 401));
    let rate_verdict = result
        .verdicts
        .iter()
        .find(|v| v.expr == "rate<0.01")
        .unwrap();
    assert!(!rate_verdict.passed);
}

#[tokio::test]
async fn pacing_throttles_iteration_rate() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut config = short_config(format!("{}/api/orders", mock_server.uri()));
    config.stages = parse_stages(&["400ms:2"]);
    config.pacing_ms = 150;
    let result = execute::run(config).await.unwrap();

    assert!(result.stats.total_requests >= 1);
    // 两个用户各自最多活跃400ms, 每150ms一单, 算上边界一单封顶8单
    // 不节流的话本地回环在这个窗口里能打出几百单
    assert!(
        result.stats.total_requests <= 8,
        "间隔150ms的节流下不该打出{}个请求",
        result.stats.total_requests
    );
    assert_eq!(result.stats.err_count, 0);
}

#[tokio::test]
async fn interrupted_schedule_drains_before_returning() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut config = short_config(format!("{}/api/orders", mock_server.uri()));
    config.stages = parse_stages(&["1s:4"]);
    config.tick_interval_ms = 20;

    let (result_tx, mut result_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = watch::channel(false);
    let scheduler = RampScheduler::new(config, HeaderMap::new(), result_tx);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    // 等几个用户起来再打断
    tokio::time::sleep(Duration::from_millis(400)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();

    // 返回时所有用户都已摘牌, 在途结果全部落袋, 发送端一个不剩
    let mut drained = 0;
    while result_rx.try_recv().is_ok() {
        drained += 1;
    }
    assert!(drained > 0);
    assert!(matches!(
        result_rx.try_recv(),
        Err(mpsc::error::TryRecvError::Disconnected)
    ));
}

#[tokio::test]
async fn stalled_target_counts_network_errors() {
    let mock_server = MockServer::start().await;
    // 响应比客户端超时还慢, 每个请求都该超时
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
        .mount(&mock_server)
        .await;

    let mut config = short_config(format!("{}/api/orders", mock_server.uri()));
    config.stages = parse_stages(&["200ms:2", "100ms:0"]);
    config.thresholds = parse_thresholds(&["rate<0.01"]);
    config.timeout_secs = 1;
    let result = execute::run(config).await.unwrap();

    assert!(!result.passed);
    assert!(result.stats.err_count > 0);
    let network_check = result
        .stats
        .checks
        .iter()
        .find(|c| c.name == "[NETWORK ERROR]")
        .unwrap();
    assert_eq!(network_check.fails, result.stats.err_count);
    // 超时在结果里记成状态0
    assert!(result.stats.http_errors.keys().any(|(code, _)| *code == 0));
}
