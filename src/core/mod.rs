pub mod aggregator;
pub mod check_run_config;
pub mod clock;
pub mod evaluate_thresholds;
pub mod execute;
pub mod order_generator;
pub mod ramp_scheduler;
pub mod share_results_periodically;
pub mod show_result_with_table;
pub mod status_share;
pub(crate) mod virtual_user;
