use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXPERIMENTS: &str = r#"{"experiments": [
  {"id": 1, "name": "mnist", "results": [
    {"id": 1, "name": "a", "logs": [
      {"iteration": 0, "epoch": 0, "main/loss": 1.0},
      {"iteration": 1, "epoch": 0, "main/loss": 0.5}
    ]},
    {"id": 2, "name": "b", "logs": [
      {"iteration": 1, "epoch": 0, "main/loss": 0.75}
    ]}
  ]}
]}"#;

const ACTIONS: &str = r#"# select a log key and hide result 2
{"type": "AXIS_CONFIG_LOG_KEY_SELECT_TOGGLE", "projectId": 1, "axisName": "yAxis", "logKey": "main/loss"}
{"type": "AXIS_CONFIG_X_KEY_UPDATE", "projectId": 1, "axisName": "xAxis", "xAxisKey": "iteration"}
{"type": "RESULTS_CONFIG_SELECT_TOGGLE", "projectId": 1, "resultId": 2}
{"type": "GLOBAL_CONFIG_CHART_SIZE_UPDATE", "chartSize": "large"}
not an action
"#;

fn expview(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expview").unwrap();
    cmd.arg("--config").arg(tmp.path().join("config.yaml"));
    cmd
}

fn write_inputs(tmp: &TempDir) {
    std::fs::write(tmp.path().join("experiments.json"), EXPERIMENTS).unwrap();
    std::fs::write(tmp.path().join("actions.jsonl"), ACTIONS).unwrap();
}

#[test]
fn test_help() {
    Command::cargo_bin("expview")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_keys_splits_axis_candidates() {
    let tmp = TempDir::new().unwrap();
    write_inputs(&tmp);
    expview(&tmp)
        .arg("keys")
        .arg(tmp.path().join("experiments.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("iteration"))
        .stdout(predicate::str::contains("main/loss"));
}

#[test]
fn test_plot_json_merges_points() {
    let tmp = TempDir::new().unwrap();
    write_inputs(&tmp);
    let output = expview(&tmp)
        .arg("plot")
        .arg(tmp.path().join("experiments.json"))
        .args(["-x", "iteration", "-y", "main/loss", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = out["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], serde_json::json!({"iteration": 0.0, "1": 1.0}));
    assert_eq!(rows[1], serde_json::json!({"iteration": 1.0, "1": 0.5, "2": 0.75}));
    assert_eq!(out["series"][1]["name"], "mnist.b");
}

#[test]
fn test_plot_missing_input_fails() {
    let tmp = TempDir::new().unwrap();
    expview(&tmp)
        .arg("plot")
        .arg(tmp.path().join("missing.json"))
        .args(["-y", "loss"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_replay_without_save_leaves_disk_untouched() {
    let tmp = TempDir::new().unwrap();
    write_inputs(&tmp);
    expview(&tmp)
        .arg("replay")
        .arg(tmp.path().join("actions.jsonl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("large"));
    assert!(!tmp.path().join("config.yaml").exists());
}

#[test]
fn test_replay_save_then_show() {
    let tmp = TempDir::new().unwrap();
    write_inputs(&tmp);
    expview(&tmp)
        .arg("replay")
        .arg(tmp.path().join("actions.jsonl"))
        .arg("--save")
        .assert()
        .success();

    expview(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("large (1280x720)"))
        .stdout(predicate::str::contains("main/loss"));
}

#[test]
fn test_config_updates_and_reset() {
    let tmp = TempDir::new().unwrap();
    expview(&tmp)
        .args(["config", "polling-rate", "30000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30s"));
    expview(&tmp)
        .args(["config", "chart-size", "normal"])
        .assert()
        .success();
    expview(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30s"))
        .stdout(predicate::str::contains("normal"));

    expview(&tmp).args(["config", "reset"]).assert().success();
    expview(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("showing defaults"));
}

#[test]
fn test_invalid_chart_size_is_rejected() {
    let tmp = TempDir::new().unwrap();
    expview(&tmp)
        .args(["config", "chart-size", "huge"])
        .assert()
        .failure();
}

#[test]
fn test_stale_config_is_ignored() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("config.yaml"),
        "version: 1\nconfig:\n  global:\n    pollingRate: 0\n    chartSize: large\n",
    )
    .unwrap();
    expview(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("older schema"))
        .stdout(predicate::str::contains("small"));
}

#[test]
fn test_watch_renders_once_when_polling_disabled() {
    let tmp = TempDir::new().unwrap();
    write_inputs(&tmp);
    expview(&tmp)
        .arg("replay")
        .arg(tmp.path().join("actions.jsonl"))
        .arg("--save")
        .assert()
        .success();
    expview(&tmp)
        .args(["config", "polling-rate", "0"])
        .assert()
        .success();

    expview(&tmp)
        .arg("watch")
        .arg(tmp.path().join("experiments.json"))
        .args(["--project", "1"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("── main/loss ──"))
        .stdout(predicate::str::contains("mnist.a"))
        .stdout(predicate::str::contains("mnist.b").not());
}

#[test]
fn test_watch_stops_after_count() {
    let tmp = TempDir::new().unwrap();
    write_inputs(&tmp);
    expview(&tmp)
        .args(["config", "polling-rate", "5000"])
        .assert()
        .success();
    expview(&tmp)
        .arg("watch")
        .arg(tmp.path().join("experiments.json"))
        .args(["--project", "1", "--count", "1"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("No y-axis log keys selected"));
}
