use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("cord-miner").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn extract_requires_its_inputs() {
    let mut cmd = Command::cargo_bin("cord-miner").expect("binary exists");
    cmd.arg("extract").assert().failure();
}
