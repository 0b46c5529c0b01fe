use std::path::Path;
use std::process::ExitCode;

use chrono::NaiveDate;

use crate::commands::base_commands::Commands;
use crate::commands::{failure, not_found};
use crate::services::evaluator::evaluate;
use crate::services::report::export_report;
use crate::services::scenario_file::load_input_from_file;
use crate::services::store_config::open_configured_store;

pub fn report_command(config: Option<&str>, cmd: Commands) -> ExitCode {
    if let Commands::Report {
        input,
        id,
        name,
        output,
        chart,
        date,
    } = cmd
    {
        let generated_on = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => return failure("parse report date", e),
        };

        let (scenario, stored_name) = match (input, id) {
            (Some(path), _) => match load_input_from_file(&path) {
                Ok(scenario) => (scenario, None),
                Err(e) => return failure("load scenario", e),
            },
            (None, Some(id)) => {
                let store = match open_configured_store(config) {
                    Ok(store) => store,
                    Err(e) => return failure("open scenario store", e),
                };
                match store.read(&id) {
                    Ok(Some(record)) => (record.input, Some(record.name)),
                    Ok(None) => return not_found(&id),
                    Err(e) => return failure("read scenario", e),
                }
            }
            (None, None) => return failure("build report", "no scenario given"),
        };

        let name = name.or(stored_name);
        let result = evaluate(&scenario);
        let written = match export_report(
            Path::new(&output),
            &result,
            &scenario,
            name.as_deref(),
            generated_on,
            chart,
        ) {
            Ok(paths) => paths,
            Err(e) => return failure("write report", e),
        };

        let mut written = written.into_iter();
        if let Some(report) = written.next() {
            println!("Report written to {}", report.display());
        }
        if let Some(chart) = written.next() {
            println!("Cost chart written to {}", chart.display());
        }
    }
    ExitCode::SUCCESS
}
