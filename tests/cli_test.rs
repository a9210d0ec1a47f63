//! Binary behavior for each subcommand.

use assert_cmd::Command;
use indoc::indoc;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const RISK_FILE: &str = indoc! {r#"
    [[hazards]]
    id = "H-1"
    description = "Battery overheating"
    category = "Thermal"
    harm = "Burn"
    severity = 3
    probability = 4

    [[hazards]]
    id = "H-2"
    description = "Display misread"
    category = "Human Factors"
    harm = "Wrong dose"
    severity = 2
    probability = 2

    [[controls]]
    id = "C-1"
    hazard_id = "H-1"
    description = "Thermal cutoff"
    control_type = "Prevention"
    verification_method = "Thermal chamber test"
    status = "Implemented"
    residual_severity = 1
    residual_probability = 3
"#};

fn qmsrisk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qmsrisk").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("risks.toml"), RISK_FILE).unwrap();
    dir
}

#[test]
fn test_register_json() {
    let dir = workspace();
    let output = qmsrisk(&dir)
        .args(["register", "risks.toml", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["hazard_id"], "H-1");
    assert_eq!(rows[0]["residual_risk_score"], 3);
    assert_eq!(rows[0]["status"], "Controlled");
    assert_eq!(json["high_priority"].as_array().unwrap().len(), 1);
}

#[test]
fn test_register_to_file_markdown() {
    let dir = workspace();
    qmsrisk(&dir)
        .args(["register", "risks.toml", "-f", "markdown", "-o", "register.md"])
        .assert()
        .success();
    let text = fs::read_to_string(dir.path().join("register.md")).unwrap();
    assert!(text.starts_with("# Risk Register"));
    assert!(text.contains("| H-2 | Human Factors/Usability |"));
}

#[test]
fn test_threshold_from_config_file() {
    let dir = workspace();
    fs::write(
        dir.path().join(".qmsrisk.toml"),
        "[thresholds]\nhigh_priority = 4\n",
    )
    .unwrap();
    let output = qmsrisk(&dir)
        .args(["register", "risks.toml", "--format", "json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["high_priority_threshold"], 4);
    assert_eq!(json["high_priority"].as_array().unwrap().len(), 2);
}

#[test]
fn test_plan_for_unknown_hazard_fails_with_not_found_code() {
    let dir = workspace();
    let output = qmsrisk(&dir)
        .args(["plan", "risks.toml", "H-9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Hazard 'H-9' not found"));
}

#[test]
fn test_plan_json() {
    let dir = workspace();
    let output = qmsrisk(&dir)
        .args(["plan", "risks.toml", "H-1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["hazard"]["initial_risk_score"], 12);
    assert_eq!(json["verification_plan"][0]["status"], "Planned");
}

#[test]
fn test_matrix_terminal() {
    let dir = TempDir::new().unwrap();
    let output = qmsrisk(&dir).arg("matrix").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("CATASTROPHIC"));
    assert!(text.contains("UNACCEPTABLE"));
}

#[test]
fn test_gap_with_bundled_catalog() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("status.toml"),
        indoc! {r#"
            qms-1 = "compliant"
            qms-2 = "partial"
            dc-1 = "non-compliant"
        "#},
    )
    .unwrap();
    let output = qmsrisk(&dir)
        .args(["gap", "status.toml", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["score"]["total"], 43);
    assert_eq!(json["score"]["compliant_count"], 1);
    assert_eq!(json["score"]["score_percent"], 3);
    assert_eq!(json["critical_gaps"].as_array().unwrap().len(), 35);
}

#[test]
fn test_gap_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("status.json"), r#"{"qms-1": "done"}"#).unwrap();
    let output = qmsrisk(&dir).args(["gap", "status.json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_out_of_range_rank_in_risk_file_is_validation_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("risks.toml"),
        RISK_FILE.replace("severity = 3\nprobability = 4", "severity = 7\nprobability = 4"),
    )
    .unwrap();
    let output = qmsrisk(&dir)
        .args(["register", "risks.toml", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("severity"));
}

#[test]
fn test_suggest_prints_templates() {
    let dir = TempDir::new().unwrap();
    let output = qmsrisk(&dir)
        .args([
            "suggest",
            "--product",
            "Infusion pump",
            "--intended-use",
            "IV delivery",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[0]["category"], "Mechanical");
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    qmsrisk(&dir).arg("init").assert().success();
    assert!(dir.path().join(".qmsrisk.toml").exists());
    qmsrisk(&dir).arg("init").assert().failure();
    qmsrisk(&dir).args(["init", "--force"]).assert().success();
}
