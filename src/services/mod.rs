pub mod cost_chart;
pub mod evaluator;
pub mod file_store;
pub mod kv_store;
pub mod report;
pub mod scenario_file;
pub mod scenario_store;
pub mod store_config;
