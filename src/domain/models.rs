use crate::settings::{SettingsTree, SettingsValue};
use serde::{Deserialize, Serialize};

/// Administrator-supplied deployment profile, already merged across source
/// tiers. Immutable for the life of a snapshot; `fingerprint` identifies the
/// snapshot so the locked-path index and the effective settings derived from
/// it can be checked for drift.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentProfile {
    pub defaults: SettingsTree,
    pub locked: SettingsTree,
    pub fingerprint: String,
}

impl DeploymentProfile {
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.locked.is_empty()
    }
}

/// One CLI assignment, addressed by dotted path. The value is a scalar or an
/// array of scalars; object values are not constructible from the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedChange {
    pub path: String,
    pub value: SettingsValue,
}

/// Per-change decision. `RejectedLocked` never appears in a successful
/// control-channel response: a batch containing one is rejected whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
    Applied { path: String },
    RejectedLocked { path: String },
    NoChangeNecessary { path: String },
}

impl MutationOutcome {
    pub fn path(&self) -> &str {
        match self {
            MutationOutcome::Applied { path }
            | MutationOutcome::RejectedLocked { path }
            | MutationOutcome::NoChangeNecessary { path } => path,
        }
    }
}

/// Request half of the control channel between the one-shot CLI and the
/// settings owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlRequest {
    Ping,
    Get,
    Apply { changes: Vec<ProposedChange> },
    FactoryReset,
    Reload,
    Shutdown,
}

/// Response half of the control channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlResponse {
    Pong,
    Ack,
    Settings {
        settings: SettingsTree,
    },
    Outcomes {
        outcomes: Vec<MutationOutcome>,
        settings: SettingsTree,
    },
    Error {
        code: String,
        message: String,
    },
}

/// `--json` report for a `set` invocation that succeeded.
#[derive(Debug, Serialize)]
pub struct SetReport {
    pub status: String,
    pub outcomes: Vec<MutationOutcome>,
}

/// `--json` report for `profile locked`.
#[derive(Debug, Serialize)]
pub struct LockedPathsReport {
    pub fingerprint: String,
    pub paths: Vec<String>,
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
