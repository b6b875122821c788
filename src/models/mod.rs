pub mod args;
pub mod stage;
pub mod threshold_rule;
pub mod status_check;
pub mod run_config;
pub mod order;
pub mod request_result;
pub mod result;
