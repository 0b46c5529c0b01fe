use std::fmt::Display;
use std::process::ExitCode;

pub mod base_commands;
pub mod completions_cmd;
pub mod evaluate_cmd;
pub mod health_cmd;
pub mod report_cmd;
pub mod report_format;
pub mod scenario_cmd;

pub(crate) fn failure(action: &str, error: impl Display) -> ExitCode {
    eprintln!("Failed to {action}: {error}");
    ExitCode::FAILURE
}

pub(crate) fn not_found(id: &str) -> ExitCode {
    eprintln!("Scenario {id} not found");
    ExitCode::FAILURE
}
