use std::process::ExitCode;

use crate::commands::base_commands::ScenarioCommands;
use crate::commands::evaluate_cmd::render_evaluation;
use crate::commands::report_format::format_scenario_list;
use crate::commands::{failure, not_found};
use crate::domain::scenario::ScenarioPatch;
use crate::services::evaluator::evaluate;
use crate::services::scenario_file::load_input_from_file;
use crate::services::scenario_store::ScenarioStore;
use crate::services::store_config::open_configured_store;

pub fn scenario_command(config: Option<&str>, cmd: ScenarioCommands) -> ExitCode {
    let store = match open_configured_store(config) {
        Ok(store) => store,
        Err(e) => return failure("open scenario store", e),
    };
    run_scenario_command(store.as_ref(), cmd)
}

pub fn run_scenario_command(store: &dyn ScenarioStore, cmd: ScenarioCommands) -> ExitCode {
    match cmd {
        ScenarioCommands::Create { name, input } => {
            let scenario = match load_input_from_file(&input) {
                Ok(scenario) => scenario,
                Err(e) => return failure("load scenario", e),
            };
            match store.create(&name, scenario) {
                Ok(record) => {
                    println!("Scenario {} created", record.id);
                    ExitCode::SUCCESS
                }
                Err(e) => failure("create scenario", e),
            }
        }
        ScenarioCommands::Show { id } => match store.read(&id) {
            Ok(Some(record)) => match serde_yaml::to_string(&record) {
                Ok(yaml) => {
                    print!("{yaml}");
                    ExitCode::SUCCESS
                }
                Err(e) => failure("serialize scenario", e),
            },
            Ok(None) => not_found(&id),
            Err(e) => failure("read scenario", e),
        },
        ScenarioCommands::Update { id, name, input } => {
            let input = match input.as_deref().map(load_input_from_file).transpose() {
                Ok(input) => input,
                Err(e) => return failure("load scenario", e),
            };
            match store.update(&id, ScenarioPatch { name, input }) {
                Ok(Some(record)) => {
                    println!("Scenario {} updated", record.id);
                    ExitCode::SUCCESS
                }
                Ok(None) => not_found(&id),
                Err(e) => failure("update scenario", e),
            }
        }
        ScenarioCommands::Delete { id } => match store.delete(&id) {
            Ok(()) => {
                println!("Scenario {id} deleted");
                ExitCode::SUCCESS
            }
            Err(e) => failure("delete scenario", e),
        },
        ScenarioCommands::List => match store.list() {
            Ok(summaries) => {
                println!("{}", format_scenario_list(&summaries));
                ExitCode::SUCCESS
            }
            Err(e) => failure("list scenarios", e),
        },
        ScenarioCommands::Evaluate { id, format } => match store.read(&id) {
            Ok(Some(record)) => {
                let result = evaluate(&record.input);
                match render_evaluation(format, Some(&record.name), &record.input, &result) {
                    Ok(output) => {
                        println!("{output}");
                        ExitCode::SUCCESS
                    }
                    Err(e) => failure("serialize evaluation", e),
                }
            }
            Ok(None) => not_found(&id),
            Err(e) => failure("read scenario", e),
        },
    }
}
