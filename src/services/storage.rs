use crate::domain::constants::{
    APP_DIR, AUDIT_FILE, CONFIG_FILE, DEFAULT_SYSTEM_PROFILE_DIR, ENV_SOCKET,
    ENV_SYSTEM_PROFILE_DIR, PROFILE_FILE, SOCKET_FILE, USER_SETTINGS_FILE,
};
use crate::settings::SettingsTree;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Every filesystem location the process touches, resolved exactly once at
/// startup from the environment and passed down. Nothing re-reads `HOME` or
/// the override variables after construction.
#[derive(Debug, Clone)]
pub struct AppPaths {
    home: PathBuf,
    system_profile_dir: PathBuf,
    runtime_dir: Option<PathBuf>,
    socket_override: Option<PathBuf>,
}

impl AppPaths {
    pub fn from_env() -> anyhow::Result<Self> {
        let home = PathBuf::from(std::env::var("HOME")?);
        let system_profile_dir = std::env::var(ENV_SYSTEM_PROFILE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SYSTEM_PROFILE_DIR));
        let runtime_dir = std::env::var("XDG_RUNTIME_DIR").ok().map(PathBuf::from);
        let socket_override = std::env::var(ENV_SOCKET).ok().map(PathBuf::from);
        Ok(Self {
            home,
            system_profile_dir,
            runtime_dir,
            socket_override,
        })
    }

    /// Constructor for callers that already know the locations (tests, the
    /// owner bootstrapped against a fixture directory).
    pub fn new(home: PathBuf, system_profile_dir: PathBuf) -> Self {
        Self {
            home,
            system_profile_dir,
            runtime_dir: None,
            socket_override: None,
        }
    }

    pub fn system_profile_path(&self) -> PathBuf {
        self.system_profile_dir.join(PROFILE_FILE)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.home.join(".config").join(APP_DIR)
    }

    pub fn user_profile_path(&self) -> PathBuf {
        self.config_dir().join(PROFILE_FILE)
    }

    pub fn user_settings_path(&self) -> PathBuf {
        self.config_dir().join(USER_SETTINGS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join(CONFIG_FILE)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join(APP_DIR)
    }

    pub fn audit_path(&self) -> PathBuf {
        self.data_dir().join(AUDIT_FILE)
    }

    fn default_socket_path(&self) -> PathBuf {
        match &self.runtime_dir {
            Some(dir) => dir.join(SOCKET_FILE),
            None => self.data_dir().join(SOCKET_FILE),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub general: CliConfigGeneral,
}

#[derive(Debug, Deserialize, Default)]
pub struct CliConfigGeneral {
    #[serde(default)]
    pub socket: Option<PathBuf>,
}

pub fn load_cli_config(paths: &AppPaths) -> anyhow::Result<CliConfig> {
    let path = paths.config_path();
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Control socket resolution: `--socket` flag, then `PREFCTL_SOCKET`, then
/// `config.toml`, then the platform default.
pub fn resolve_socket(paths: &AppPaths, flag: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &paths.socket_override {
        return Ok(path.clone());
    }
    if let Some(path) = load_cli_config(paths)?.general.socket {
        return Ok(path);
    }
    Ok(paths.default_socket_path())
}

/// Persisted user settings: the sparse tree of user overrides. Missing file
/// means "no overrides yet".
pub fn load_user_settings(paths: &AppPaths) -> anyhow::Result<SettingsTree> {
    let path = paths.user_settings_path();
    if !path.exists() {
        return Ok(SettingsTree::new());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_user_settings(paths: &AppPaths, settings: &SettingsTree) -> anyhow::Result<()> {
    let path = paths.user_settings_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

pub fn clear_user_settings(paths: &AppPaths) -> anyhow::Result<()> {
    let path = paths.user_settings_path();
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Best-effort append to the audit log; never fails the mutation it records.
pub fn audit(paths: &AppPaths, action: &str, data: serde_json::Value) {
    let path = paths.audit_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| f.write_all(line.as_bytes()));
}
