use crate::domain::models::DeploymentProfile;
use crate::services::storage::AppPaths;
use crate::settings::{deep_merge, SettingsTree};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One on-disk profile document. Exactly two sections are recognized;
/// anything else marks the source malformed rather than silently ignored,
/// since an unreadable profile means the locking state is ambiguous.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileDocument {
    #[serde(default)]
    defaults: SettingsTree,
    #[serde(default)]
    locked: SettingsTree,
}

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("cannot read profile source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("profile source {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Read the deployment profile tiers and merge them into one snapshot.
///
/// No source present yields the empty profile. The system tier takes
/// precedence over the user tier; `defaults` and `locked` are merged
/// independently, leaf by leaf, with the same deep-merge rule the settings
/// owner uses. Pure read: persisted state is never touched.
pub fn read_deployment_profiles(paths: &AppPaths) -> Result<DeploymentProfile, ProfileError> {
    let user = read_document(&paths.user_profile_path())?;
    let system = read_document(&paths.system_profile_path())?;

    let mut defaults = SettingsTree::new();
    let mut locked = SettingsTree::new();
    for document in [user, system].into_iter().flatten() {
        deep_merge(&mut defaults, &document.defaults);
        deep_merge(&mut locked, &document.locked);
    }

    let fingerprint = fingerprint(&defaults, &locked);
    debug!(%fingerprint, locked_sections = locked.len(), "deployment profile snapshot loaded");
    Ok(DeploymentProfile {
        defaults,
        locked,
        fingerprint,
    })
}

fn read_document(path: &Path) -> Result<Option<ProfileDocument>, ProfileError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| ProfileError::Malformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

/// Snapshot identity: a digest over the canonical serialization of the
/// merged sections. BTreeMap ordering makes the bytes deterministic.
fn fingerprint(defaults: &SettingsTree, locked: &SettingsTree) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(defaults).unwrap_or_default());
    hasher.update(b"|");
    hasher.update(serde_json::to_vec(locked).unwrap_or_default());
    format!("{:x}", hasher.finalize())
}
