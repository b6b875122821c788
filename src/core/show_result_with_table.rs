use crate::models::result::TestResult;
use prettytable::{format, row, Cell, Row, Table};

pub fn show_result_with_table(result: &TestResult) {
    let stats = &result.stats;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    table.add_row(row!["指标", "值"]);
    table.add_row(row!["总耗时", format!("{:.2}s", stats.total_duration)]);
    table.add_row(row!["RPS", format!("{:.3}", stats.rps)]);
    table.add_row(row!["总请求数", format!("{:?}", stats.total_requests)]);
    table.add_row(row!["错误数量", format!("{:?}", stats.err_count)]);
    table.add_row(row!["成功率", format!("{:.2}%", stats.success_rate)]);
    table.add_row(row!["最大响应时间", format!("{:.2}ms", stats.max_response_time)]);
    table.add_row(row!["最小响应时间", format!("{:.2}ms", stats.min_response_time)]);
    table.add_row(row!["中位响应时间", format!("{} ms", stats.median_response_time)]);
    table.add_row(row!["95%响应时间", format!("{} ms", stats.response_time_95)]);
    table.add_row(row!["99%响应时间", format!("{} ms", stats.response_time_99)]);
    table.add_row(row!["总吞吐量", format!("{:.2}kb", stats.total_data_kb)]);
    table.add_row(row!["每秒吞吐量", format!("{:.2}kb", stats.throughput_per_second_kb)]);
    println!("压测结果:");
    table.printstd();

    if !stats.checks.is_empty() {
        let mut checks_table = Table::new();
        checks_table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        checks_table.add_row(row!["检查", "通过", "失败"]);
        for check in &stats.checks {
            checks_table.add_row(row![check.name, check.passes, check.fails]);
        }
        println!("检查结果:");
        checks_table.printstd();
    }

    if !stats.http_errors.is_empty() {
        let mut errors_table = Table::new();
        errors_table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        errors_table.add_row(row!["错误代码", "错误信息", "次数"]);
        for ((status_code, message), count) in &stats.http_errors {
            errors_table.add_row(Row::new(vec![
                Cell::new(format!("{:03}", status_code).as_str()),
                Cell::new(&format!("{:?}", message)).style_spec("R"),
                Cell::new(format!("{}", count).as_str()),
            ]));
        }
        println!("HTTP 错误:");
        errors_table.printstd();
    }

    if !result.verdicts.is_empty() {
        let mut thresholds_table = Table::new();
        thresholds_table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        thresholds_table.add_row(row!["阈值", "实测", "结论"]);
        for verdict in &result.verdicts {
            thresholds_table.add_row(row![
                verdict.expr,
                format!("{:.3}", verdict.observed),
                if verdict.passed { "通过" } else { "未通过" }
            ]);
        }
        println!("阈值评定:");
        thresholds_table.printstd();
    }

    match result.passed {
        true => println!("整体结论: 通过"),
        false => println!("整体结论: 未通过"),
    }
}
