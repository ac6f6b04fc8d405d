use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn od600() -> Command {
    let mut cmd = Command::cargo_bin("od600-calc").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_dilute_prints_volumes() {
    od600()
        .args(["dilute", "--culture-od", "1.8", "--target-od", "0.1", "--volume", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Culture to add: 2.778 mL"))
        .stdout(predicate::str::contains("Media to add:   47.222 mL"));
}

#[test]
fn test_dilute_small_volume_shown_in_microlitres() {
    od600()
        .args(["dilute", "--culture-od", "2.0", "--target-od", "0.05", "--volume", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Culture to add: 250.0 µL"));
}

#[test]
fn test_dilute_invalid_exit_code() {
    od600()
        .args(["dilute", "--culture-od", "0.5", "--target-od", "0.5", "--volume", "10"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Culture OD must be greater than Target OD.",
        ));
}

#[test]
fn test_dilute_incomplete_exit_code() {
    od600()
        .args(["dilute", "--culture-od", "1.8", "--volume", "10"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("0.000 mL"));
}

#[test]
fn test_dilute_json() -> Result<()> {
    let output = od600()
        .args([
            "dilute", "--culture-od", "2", "--target-od", "0.5", "--volume", "1", "--unit", "L",
            "--format", "json",
        ])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["culture_volume_ml"], 250.0);
    assert_eq!(json["media_volume_ml"], 750.0);
    assert!(json.get("message").is_none());
    Ok(())
}

#[test]
fn test_grow_with_start_time() {
    od600()
        .args(["grow", "--start-od", "0.1", "--target-od", "1.0", "--start-time", "09:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated time: 10:09 (1.15 h)"));
}

#[test]
fn test_grow_custom_species() {
    od600()
        .args([
            "grow", "--start-od", "0.1", "--target-od", "1.0", "--species", "Custom",
            "--custom-rate", "1.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated time: 2.30 h"));
}

#[test]
fn test_grow_invalid() {
    od600()
        .args(["grow", "--start-od", "1.0", "--target-od", "0.5"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Enter valid values (target OD > start OD > 0, rate > 0)",
        ));
}

#[test]
fn test_species_listing() {
    od600()
        .arg("species")
        .assert()
        .success()
        .stdout(predicate::str::contains("E. coli"))
        .stdout(predicate::str::contains("S. cerevisiae  0.4 /h"))
        .stdout(predicate::str::contains("user supplied (default 1 /h)"));
}

#[test]
fn test_config_file_overrides() -> Result<()> {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("od600.toml");
    std::fs::write(
        &config_path,
        "[species_rates]\ne_coli = 1.0\n\n[display]\nhours_decimals = 3\n",
    )?;

    od600()
        .args(["grow", "--start-od", "0.1", "--target-od", "1.0", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated time: 2.303 h"));
    Ok(())
}

#[test]
fn test_bad_config_is_runtime_error() -> Result<()> {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("od600.toml");
    std::fs::write(&config_path, "[species_rates]\ne_coli = 0.0\n")?;

    od600()
        .args(["species", "--config"])
        .arg(&config_path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("species_rates.e_coli"));
    Ok(())
}

#[test]
fn test_batch_to_file() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("plate.csv");
    let output = dir.path().join("volumes.csv");
    std::fs::write(
        &input,
        "label,culture_od,target_od,final_volume,unit\nA1,1.8,0.1,50,mL\nA2,0.5,0.5,10,mL\n",
    )?;

    od600()
        .args(["batch", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 ok, 1 invalid, 0 incomplete)"));

    let written = std::fs::read_to_string(&output)?;
    assert!(written.contains("A2,,,invalid,Culture OD must be greater than Target OD."));
    Ok(())
}

#[test]
fn test_interactive_dilution_session() {
    od600()
        .args(["interactive", "dilute"])
        .write_stdin("culture_od=1.8\ntarget_od=0.1\nfinal_volume=50\nunit=L\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Culture to add: 2.778 mL"))
        .stdout(predicate::str::contains("Culture to add: 2777.778 mL"));
}
