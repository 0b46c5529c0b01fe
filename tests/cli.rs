use assert_cmd::prelude::*;
use predicates::prelude::*;

#[test]
fn test_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("scenario"))
        .stdout(predicate::str::contains("report"));
    Ok(())
}

#[test]
fn test_cli_rejects_unknown_command() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("fleetcalc");
    cmd.arg("simulate");
    cmd.assert().failure();
}
