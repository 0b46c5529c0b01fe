use std::io;
use std::path::Path;
use std::process::ExitCode;

use crate::commands::base_commands::{Commands, OutputFormat};
use crate::commands::failure;
use crate::commands::report_format::format_evaluation;
use crate::domain::result::ScenarioResult;
use crate::domain::scenario::ScenarioInput;
use crate::services::evaluator::evaluate;
use crate::services::scenario_file::{
    load_input_from_file, serialize_evaluation_to_json, serialize_evaluation_to_yaml,
};

pub fn evaluate_command(cmd: Commands) -> ExitCode {
    if let Commands::Evaluate {
        input,
        defaults,
        output,
        format,
    } = cmd
    {
        let scenario = match input.as_deref() {
            Some(path) if !defaults => match load_input_from_file(path) {
                Ok(scenario) => scenario,
                Err(e) => return failure("load scenario", e),
            },
            _ => ScenarioInput::default_scenario(),
        };

        let result = evaluate(&scenario);
        let format = format.unwrap_or_else(|| default_format(output.as_deref()));
        let rendered = match render_evaluation(format, None, &scenario, &result) {
            Ok(contents) => contents,
            Err(e) => return failure("serialize evaluation", e),
        };

        match output {
            Some(path) => {
                if let Err(e) = std::fs::write(&path, rendered) {
                    return failure("write evaluation output", e);
                }
                println!("Evaluation written to {path}");
            }
            None => println!("{rendered}"),
        }
    }
    ExitCode::SUCCESS
}

/// Text on stdout; files follow their extension, YAML unless `.json`.
fn default_format(output: Option<&str>) -> OutputFormat {
    match output.map(Path::new) {
        None => OutputFormat::Text,
        Some(path) if path.extension().and_then(|ext| ext.to_str()) == Some("json") => {
            OutputFormat::Json
        }
        Some(_) => OutputFormat::Yaml,
    }
}

pub(crate) fn render_evaluation(
    format: OutputFormat,
    name: Option<&str>,
    input: &ScenarioInput,
    result: &ScenarioResult,
) -> io::Result<String> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Text => return Ok(format_evaluation(name, result)),
        OutputFormat::Yaml => serialize_evaluation_to_yaml(&mut buffer, input, result)?,
        OutputFormat::Json => serialize_evaluation_to_json(&mut buffer, input, result)?,
    }
    String::from_utf8(buffer).map_err(io::Error::other)
}
