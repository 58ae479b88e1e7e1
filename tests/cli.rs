use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn fixture() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let tmp = TempDir::new().expect("temp dir");
    let home = tmp.path().join("home");
    let system = tmp.path().join("system");
    std::fs::create_dir_all(&home).expect("home");
    std::fs::create_dir_all(&system).expect("system");
    std::fs::write(
        system.join("profile.json"),
        serde_json::json!({
            "locked": { "kubernetes": { "version": "1.26.3" } }
        })
        .to_string(),
    )
    .expect("profile");
    (tmp, home, system)
}

fn cmd(home: &std::path::Path, system: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("prefctl").expect("prefctl binary");
    cmd.env("HOME", home).env("PREFCTL_SYSTEM_PROFILE_DIR", system);
    cmd
}

#[test]
fn profile_locked_lists_locked_paths_offline() {
    let (_tmp, home, system) = fixture();
    cmd(&home, &system)
        .args(["profile", "locked"])
        .assert()
        .success()
        .stdout(contains("kubernetes.version"));
}

#[test]
fn profile_show_emits_ok_envelope() {
    let (_tmp, home, system) = fixture();
    cmd(&home, &system)
        .args(["--json", "profile", "show"])
        .assert()
        .success()
        .stdout(contains("\"ok\": true"))
        .stdout(contains("\"fingerprint\""));
}

#[test]
fn unreachable_owner_is_a_transport_error() {
    let (tmp, home, system) = fixture();
    cmd(&home, &system)
        .arg("--socket")
        .arg(tmp.path().join("missing.sock"))
        .arg("list-settings")
        .assert()
        .failure()
        .stderr(contains("cannot reach the settings owner"));
}

#[test]
fn malformed_assignment_fails_before_any_round_trip() {
    let (tmp, home, system) = fixture();
    cmd(&home, &system)
        .arg("--socket")
        .arg(tmp.path().join("missing.sock"))
        .args(["set", "--kubernetes.version"])
        .assert()
        .failure()
        .stderr(contains("must look like --dotted.path=value"));
}
