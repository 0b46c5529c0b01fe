use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::domain::result::ScenarioResult;
use crate::domain::scenario::ScenarioInput;

#[derive(Error, Debug)]
pub enum ScenarioFileError {
    #[error("failed to read scenario file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse scenario yaml: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse scenario json: {0}")]
    ParseJson(#[from] serde_json::Error),
}

/// Evaluation output written next to the input.
#[derive(Serialize)]
struct EvaluationRecord<'a> {
    input: &'a ScenarioInput,
    result: &'a ScenarioResult,
}

/// Reads a scenario input from a `.json` file, or YAML for any other extension.
pub fn load_input_from_file<P: AsRef<Path>>(path: P) -> Result<ScenarioInput, ScenarioFileError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    if is_json_file(path) {
        deserialize_input_from_json_str(&contents)
    } else {
        deserialize_input_from_yaml_str(&contents)
    }
}

pub fn deserialize_input_from_yaml_str(input: &str) -> Result<ScenarioInput, ScenarioFileError> {
    // An empty document is an empty scenario, not an error.
    if input.trim().is_empty() {
        return Ok(ScenarioInput::new());
    }
    Ok(serde_yaml::from_str(input)?)
}

pub fn deserialize_input_from_json_str(input: &str) -> Result<ScenarioInput, ScenarioFileError> {
    Ok(serde_json::from_str(input)?)
}

pub fn serialize_evaluation_to_yaml<W: Write>(
    writer: &mut W,
    input: &ScenarioInput,
    result: &ScenarioResult,
) -> io::Result<()> {
    let yaml = serde_yaml::to_string(&EvaluationRecord { input, result })
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writer.write_all(yaml.as_bytes())
}

pub fn serialize_evaluation_to_json<W: Write>(
    writer: &mut W,
    input: &ScenarioInput,
    result: &ScenarioResult,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &EvaluationRecord { input, result })
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writer.write_all(b"\n")
}

fn is_json_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::evaluator::evaluate;
    use assert_fs::prelude::*;

    #[test]
    fn deserialize_input_from_yaml_reads_camel_case_fields() {
        let yaml = r#"
materialKtonsPerYear: 5000
haulDistanceKmOneWay: 2.5
avgGradePercent: -4
uptimePercent: .nan
"#;
        let input = deserialize_input_from_yaml_str(yaml).unwrap();

        assert_eq!(input.material_ktons_per_year, Some(5000.0));
        assert_eq!(input.haul_distance_km_one_way, Some(2.5));
        assert_eq!(input.avg_grade_percent, Some(-4.0));
        assert!(input.uptime_percent.is_some_and(f64::is_nan));
        assert_eq!(input.loading_time_min, None);
    }

    #[test]
    fn deserialize_input_from_empty_yaml_is_empty_input() {
        let input = deserialize_input_from_yaml_str("  \n").unwrap();
        assert_eq!(input, ScenarioInput::new());
    }

    #[test]
    fn deserialize_input_rejects_non_numeric_values() {
        let error = deserialize_input_from_yaml_str("materialKtonsPerYear: lots").unwrap_err();
        assert!(matches!(error, ScenarioFileError::ParseYaml(_)));
    }

    #[test]
    fn load_input_from_file_picks_parser_by_extension() {
        let json_file = assert_fs::NamedTempFile::new("scenario.json").unwrap();
        json_file
            .write_str(r#"{"materialKtonsPerYear": 12, "serviceSekPerKm": 85}"#)
            .unwrap();
        let input = load_input_from_file(json_file.path()).unwrap();
        assert_eq!(input.material_ktons_per_year, Some(12.0));
        assert_eq!(input.service_sek_per_km, Some(85.0));

        let yaml_file = assert_fs::NamedTempFile::new("scenario.yaml").unwrap();
        yaml_file.write_str("loadingTimeMin: 3.5\n").unwrap();
        let input = load_input_from_file(yaml_file.path()).unwrap();
        assert_eq!(input.loading_time_min, Some(3.5));
    }

    #[test]
    fn load_input_from_missing_file_is_read_error() {
        let error = load_input_from_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(error, ScenarioFileError::Read(_)));
    }

    #[test]
    fn serialize_evaluation_to_yaml_writes_input_result_and_explain() {
        let input = ScenarioInput::default_scenario();
        let result = evaluate(&input);
        let mut buf = Vec::new();
        serialize_evaluation_to_yaml(&mut buf, &input, &result).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("input:"));
        assert!(output.contains("materialKtonsPerYear: 5000.0"));
        assert!(output.contains("trucksNeeded: 7"));
        assert!(output.contains("capexEur: 2450000.0"));
        assert!(output.contains("serviceCurrency: SEK"));
        let explain = &output[output.find("explain:").unwrap()..];
        let speed = explain.find("speedFactor:").unwrap();
        let cycle = explain.find("cycleTimeMinutes:").unwrap();
        assert!(speed < cycle);
    }

    #[test]
    fn serialize_evaluation_to_json_is_pretty_printed() {
        let input = ScenarioInput::default_scenario();
        let result = evaluate(&input);
        let mut buf = Vec::new();
        serialize_evaluation_to_json(&mut buf, &input, &result).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("\"trucksNeeded\": 7"));
        assert!(output.contains("\"opexEurPerYear\": 720000.0"));
        assert!(output.ends_with("}\n"));
    }
}
