//! Stable names shared across the CLI, the owner, and the tests.

/// Directory name under `$HOME/.config` and `$HOME/.local/share`.
pub const APP_DIR: &str = "prefctl";

pub const PROFILE_FILE: &str = "profile.json";
pub const USER_SETTINGS_FILE: &str = "settings.json";
pub const CONFIG_FILE: &str = "config.toml";
pub const AUDIT_FILE: &str = "audit.jsonl";
pub const SOCKET_FILE: &str = "prefctl.sock";

pub const DEFAULT_SYSTEM_PROFILE_DIR: &str = "/etc/prefctl";
pub const ENV_SYSTEM_PROFILE_DIR: &str = "PREFCTL_SYSTEM_PROFILE_DIR";
pub const ENV_SOCKET: &str = "PREFCTL_SOCKET";

/// Status lines on standard output. The no-changes line is a contract both
/// humans and automation match on; keep it byte-stable.
pub const STATUS_NO_CHANGES: &str = "Status: no changes necessary.";
pub const STATUS_UPDATED: &str = "Status: settings updated.";
pub const STATUS_RESET: &str = "Status: factory reset complete.";
pub const STATUS_SHUTDOWN: &str = "Status: settings owner shutting down.";
pub const STATUS_RELOADED: &str = "Status: deployment profiles reloaded.";

/// Error codes carried in the `--json` error envelope and on the control
/// channel.
pub const CODE_LOCKED_FIELD: &str = "LOCKED_FIELD";
pub const CODE_INVALID_SETTINGS: &str = "INVALID_SETTINGS";
pub const CODE_PROFILE_READ_ERROR: &str = "PROFILE_READ_ERROR";
pub const CODE_TRANSPORT_UNAVAILABLE: &str = "TRANSPORT_UNAVAILABLE";
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";
pub const CODE_INTERNAL: &str = "INTERNAL";
