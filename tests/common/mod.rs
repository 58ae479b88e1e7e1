use assert_cmd::Command;
use prefctl::domain::models::{ControlRequest, ControlResponse};
use prefctl::services::transport::request;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Child;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Isolated HOME + system profile dir + control socket, with an optional
/// settings-owner child process serving on the socket.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub system_dir: PathBuf,
    pub socket: PathBuf,
    owner: Option<Child>,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let system_dir = tmp.path().join("system");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&system_dir).expect("create system profile dir");
        let socket = tmp.path().join("prefctl.sock");

        Self {
            _tmp: tmp,
            home,
            system_dir,
            socket,
            owner: None,
        }
    }

    pub fn write_system_profile(&self, profile: &Value) {
        fs::write(
            self.system_dir.join("profile.json"),
            serde_json::to_string_pretty(profile).expect("serialize profile"),
        )
        .expect("write system profile");
    }

    pub fn write_user_profile(&self, profile: &Value) {
        let dir = self.home.join(".config/prefctl");
        fs::create_dir_all(&dir).expect("create user config dir");
        fs::write(
            dir.join("profile.json"),
            serde_json::to_string_pretty(profile).expect("serialize profile"),
        )
        .expect("write user profile");
    }

    pub fn seed_user_settings(&self, settings: &Value) {
        let dir = self.home.join(".config/prefctl");
        fs::create_dir_all(&dir).expect("create user config dir");
        fs::write(
            dir.join("settings.json"),
            serde_json::to_string_pretty(settings).expect("serialize settings"),
        )
        .expect("write user settings");
    }

    /// Spawn `prefctl serve` against this environment and block until the
    /// owner answers a ping.
    pub fn start_owner(&mut self) {
        let child = std::process::Command::new(env!("CARGO_BIN_EXE_prefctl"))
            .args(["--socket", self.socket.to_str().expect("socket path utf8"), "serve"])
            .env("HOME", &self.home)
            .env("PREFCTL_SYSTEM_PROFILE_DIR", &self.system_dir)
            .spawn()
            .expect("spawn settings owner");
        self.owner = Some(child);

        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Ok(ControlResponse::Pong) = request(&self.socket, &ControlRequest::Ping) {
                return;
            }
            assert!(
                Instant::now() < deadline,
                "settings owner never became ready"
            );
            std::thread::sleep(Duration::from_millis(25));
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("prefctl").expect("prefctl binary");
        cmd.env("HOME", &self.home)
            .env("PREFCTL_SYSTEM_PROFILE_DIR", &self.system_dir)
            .arg("--socket")
            .arg(&self.socket);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        if let Some(mut child) = self.owner.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
