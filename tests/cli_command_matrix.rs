use assert_cmd::Command;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = Command::cargo_bin("prefctl").expect("prefctl binary");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level; `set` is absent because everything after it is an
    // assignment (trailing var arg), including tokens that look like flags
    run_help(&home, &[]);

    // runtime commands
    run_help(&home, &["list-settings"]);
    run_help(&home, &["factory-reset"]);
    run_help(&home, &["shutdown"]);

    // owner + profile commands
    run_help(&home, &["serve"]);
    run_help(&home, &["profile"]);
    run_help(&home, &["profile", "show"]);
    run_help(&home, &["profile", "locked"]);
    run_help(&home, &["profile", "reload"]);
}
