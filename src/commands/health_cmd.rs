use std::process::ExitCode;

use crate::commands::failure;
use crate::commands::report_format::format_store_health;
use crate::services::store_config::open_configured_store;

/// Prints the store health. Fails when the backend is unreachable.
pub fn health_command(config: Option<&str>) -> ExitCode {
    let store = match open_configured_store(config) {
        Ok(store) => store,
        Err(e) => return failure("open scenario store", e),
    };
    let health = store.health();
    println!("{}", format_store_health(&health));
    if health.connected {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
