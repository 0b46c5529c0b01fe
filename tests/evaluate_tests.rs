use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

const PIT_A_YAML: &str = r#"
materialKtonsPerYear: 5000
haulDistanceKmOneWay: 2.5
avgSpeedLoadedKmph: 25
avgSpeedEmptyKmph: 30
avgGradePercent: 4
queueToLoaderSecondsAvg: 45
queueToDumpSecondsAvg: 60
loadingTimeMin: 3.5
dumpingTimeMin: 1.2
uptimePercent: 90
shiftChangeMinPerShift: 20
priceVehicleEur: 250000
priceHwEur: 100000
licenseEurPerYearPerTruck: 50000
siteLicenseEurPerYear: 100000
fmsFixedEurPerYear: 200000
fmsPerTruckEurPerYear: 10000
serviceSekPerKm: 85
"#;

#[test]
fn evaluate_prints_text_summary() {
    let input_file = assert_fs::NamedTempFile::new("pit.yaml").unwrap();
    input_file.write_str(PIT_A_YAML).unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.args(["evaluate", "-i", input_file.path().to_str().unwrap()]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Trucks needed: 7"))
        .stdout(predicate::str::contains("CAPEX: 2 450 000 €"))
        .stdout(predicate::str::contains("OPEX/year: 720 000 €"))
        .stdout(predicate::str::contains("cycleTimeMinutes | 18.4065"));
}

#[test]
fn evaluate_writes_json_when_output_has_json_extension() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input_file = temp.child("pit.yaml");
    input_file.write_str(PIT_A_YAML).unwrap();
    let output_file = temp.child("evaluation.json");

    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.args([
        "evaluate",
        "-i",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Evaluation written to"));

    let contents = fs::read_to_string(output_file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["result"]["trucksNeeded"], 7);
    assert_eq!(value["result"]["capexEur"], 2_450_000.0);
    assert_eq!(value["input"]["serviceSekPerKm"], 85.0);
}

#[test]
fn evaluate_accepts_json_input_and_yaml_format() {
    let input_file = assert_fs::NamedTempFile::new("pit.json").unwrap();
    input_file
        .write_str(r#"{"materialKtonsPerYear": 0, "haulDistanceKmOneWay": 3}"#)
        .unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.args([
        "evaluate",
        "-i",
        input_file.path().to_str().unwrap(),
        "--format",
        "yaml",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("trucksNeeded: 0"))
        .stdout(predicate::str::contains("costPerTonYear1Eur: 0.0"))
        .stdout(predicate::str::contains("serviceCurrency: SEK"));
}

#[test]
fn evaluate_defaults_uses_reference_scenario() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.args(["evaluate", "--defaults", "--format", "json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"trucksNeeded\": 7"))
        .stdout(predicate::str::contains("\"materialKtonsPerYear\": 5000.0"));
}

#[test]
fn evaluate_reports_missing_input_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let missing = temp.path().join("missing.yaml");

    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.args(["evaluate", "-i", missing.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load scenario"));
}

#[test]
fn evaluate_reports_malformed_yaml() {
    let input_file = assert_fs::NamedTempFile::new("broken.yaml").unwrap();
    input_file.write_str("materialKtonsPerYear: [1, 2\n").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.args(["evaluate", "-i", input_file.path().to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse scenario yaml"));
}
