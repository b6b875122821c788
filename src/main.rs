mod models;
mod core;

use clap::Parser;
use models::args::Args;
use models::run_config::RunConfig;
use models::stage::Stage;
use models::status_check::default_checks;
use models::threshold_rule::ThresholdRule;

// 不传阶梯时用内置压测曲线: 分段爬坡到400并发再收到0
const DEFAULT_STAGES: [&str; 5] = ["30s:50", "30s:100", "30s:200", "30s:400", "20s:0"];
const DEFAULT_THRESHOLDS: [&str; 2] = ["p95<500", "rate<0.01"];

fn build_config(args: Args) -> anyhow::Result<RunConfig> {
    let stage_exprs: Vec<String> = if args.stage.is_empty() {
        DEFAULT_STAGES.iter().map(|s| s.to_string()).collect()
    } else {
        args.stage
    };
    let threshold_exprs: Vec<String> = if args.threshold.is_empty() {
        DEFAULT_THRESHOLDS.iter().map(|s| s.to_string()).collect()
    } else {
        args.threshold
    };
    let stages = stage_exprs
        .iter()
        .map(|s| s.parse::<Stage>())
        .collect::<anyhow::Result<Vec<Stage>>>()?;
    let thresholds = threshold_exprs
        .iter()
        .map(|s| s.parse::<ThresholdRule>())
        .collect::<anyhow::Result<Vec<ThresholdRule>>>()?;
    Ok(RunConfig {
        url: args.url,
        username: args.username,
        password: args.password,
        stages,
        thresholds,
        checks: default_checks(),
        timeout_secs: args.timeout,
        tick_interval_ms: args.tick_interval_ms,
        pacing_ms: args.pacing_ms,
        verbose: args.verbose,
    })
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = match build_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置错误: {}", e);
            std::process::exit(2);
        }
    };
    match core::execute::run(config).await {
        Ok(result) => {
            core::show_result_with_table::show_result_with_table(&result);
            if !result.passed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
