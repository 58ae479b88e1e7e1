use crate::domain::constants::{
    CODE_INTERNAL, CODE_INVALID_SETTINGS, CODE_LOCKED_FIELD, CODE_PROFILE_READ_ERROR,
};
use crate::domain::models::{ControlRequest, ControlResponse, DeploymentProfile, ProposedChange};
use crate::services::locking::LockedPathIndex;
use crate::services::profiles::{read_deployment_profiles, ProfileError};
use crate::services::storage::{
    audit, clear_user_settings, load_user_settings, save_user_settings, AppPaths,
};
use crate::services::validator::{validate, ValidateError};
use crate::settings::{builtin_defaults, deep_merge, get_path, set_path, SettingsTree};
use anyhow::Context;
use tracing::{debug, info, warn};

/// The single authoritative holder of effective settings.
///
/// Effective settings are composed as built-in defaults < profile defaults <
/// persisted user settings < profile locked; the locked overlay is applied
/// last and unconditionally, so every mutation path goes through a full
/// recompose and an invariant check rather than editing the effective tree
/// in place.
#[derive(Debug)]
pub struct SettingsOwner {
    paths: AppPaths,
    profile: DeploymentProfile,
    index: LockedPathIndex,
    user: SettingsTree,
    effective: SettingsTree,
}

impl SettingsOwner {
    /// Load profiles and persisted user settings, compose the effective
    /// tree, and verify the locked-leaf invariant. A malformed profile is
    /// fatal here: the process must not run with ambiguous locking state.
    pub fn bootstrap(paths: AppPaths) -> anyhow::Result<Self> {
        let profile = read_deployment_profiles(&paths)?;
        let user = load_user_settings(&paths).context("load persisted user settings")?;
        let index = LockedPathIndex::build(&profile.locked, &profile.fingerprint);

        let mut owner = Self {
            paths,
            profile,
            index,
            user,
            effective: SettingsTree::new(),
        };
        owner.recompose()?;
        info!(
            fingerprint = %owner.profile.fingerprint,
            locked_paths = owner.index.len(),
            "settings owner ready"
        );
        Ok(owner)
    }

    pub fn effective(&self) -> &SettingsTree {
        &self.effective
    }

    pub fn locked_index(&self) -> &LockedPathIndex {
        &self.index
    }

    /// Serve one control request. All mutations funnel through here, and the
    /// caller serializes calls, so there is never a concurrent writer.
    pub fn handle(&mut self, request: ControlRequest) -> ControlResponse {
        match request {
            ControlRequest::Ping => ControlResponse::Pong,
            ControlRequest::Get => ControlResponse::Settings {
                settings: self.effective.clone(),
            },
            ControlRequest::Apply { changes } => self.handle_apply(&changes),
            ControlRequest::FactoryReset => match self.factory_reset() {
                Ok(()) => ControlResponse::Ack,
                Err(err) => error_response(CODE_INTERNAL, &err),
            },
            ControlRequest::Reload => match self.reload() {
                Ok(()) => ControlResponse::Ack,
                Err(err) if err.downcast_ref::<ProfileError>().is_some() => {
                    error_response(CODE_PROFILE_READ_ERROR, &err)
                }
                Err(err) => error_response(CODE_INTERNAL, &err),
            },
            // The transport loop stops accepting after acknowledging.
            ControlRequest::Shutdown => ControlResponse::Ack,
        }
    }

    fn handle_apply(&mut self, changes: &[ProposedChange]) -> ControlResponse {
        match validate(changes, &self.index, &self.effective) {
            Err(ValidateError::Locked(rejection)) => {
                debug!(paths = ?rejection.paths, "rejected mutation of locked fields");
                ControlResponse::Error {
                    code: CODE_LOCKED_FIELD.to_string(),
                    message: rejection.to_string(),
                }
            }
            Err(ValidateError::Shape(issues)) => ControlResponse::Error {
                code: CODE_INVALID_SETTINGS.to_string(),
                message: issues.to_string(),
            },
            Ok(validation) => {
                if let Err(err) = self.apply_writes(&validation.writes) {
                    warn!(error = %err, "failed to apply validated changes");
                    return error_response(CODE_INTERNAL, &err);
                }
                ControlResponse::Outcomes {
                    outcomes: validation.outcomes,
                    settings: self.effective.clone(),
                }
            }
        }
    }

    fn apply_writes(&mut self, writes: &[ProposedChange]) -> anyhow::Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        for change in writes {
            set_path(&mut self.user, &change.path, change.value.clone())?;
        }
        self.recompose()?;
        save_user_settings(&self.paths, &self.user)?;
        let paths: Vec<&str> = writes.iter().map(|c| c.path.as_str()).collect();
        audit(&self.paths, "set", serde_json::json!({ "paths": paths }));
        info!(count = writes.len(), "applied settings changes");
        Ok(())
    }

    /// Drop every user override; effective settings revert to built-in
    /// defaults + profile defaults + locked.
    pub fn factory_reset(&mut self) -> anyhow::Result<()> {
        self.user = SettingsTree::new();
        clear_user_settings(&self.paths)?;
        self.recompose()?;
        audit(&self.paths, "factory-reset", serde_json::json!({}));
        info!("factory reset complete");
        Ok(())
    }

    /// Re-read the profile sources and fully replace the locked-path index,
    /// re-asserting the locked-leaf invariant before any further mutation is
    /// accepted.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        let profile = read_deployment_profiles(&self.paths)?;
        let index = LockedPathIndex::build(&profile.locked, &profile.fingerprint);
        self.user = load_user_settings(&self.paths)?;
        self.profile = profile;
        self.index = index;
        self.recompose()?;
        audit(
            &self.paths,
            "reload",
            serde_json::json!({ "fingerprint": self.profile.fingerprint }),
        );
        info!(fingerprint = %self.profile.fingerprint, "deployment profiles reloaded");
        Ok(())
    }

    fn recompose(&mut self) -> anyhow::Result<()> {
        let mut effective = builtin_defaults();
        deep_merge(&mut effective, &self.profile.defaults);
        deep_merge(&mut effective, &self.user);
        deep_merge(&mut effective, &self.profile.locked);
        self.effective = effective;
        self.verify_locked_invariant()
    }

    /// Every leaf in the index must equal the corresponding profile-locked
    /// leaf, and both must come from the same snapshot. Failure here means a
    /// bug, not bad input, and the owner refuses to continue.
    fn verify_locked_invariant(&self) -> anyhow::Result<()> {
        if self.index.fingerprint() != self.profile.fingerprint {
            anyhow::bail!(
                "locked-path index fingerprint {} does not match profile snapshot {}",
                self.index.fingerprint(),
                self.profile.fingerprint
            );
        }
        for path in self.index.paths() {
            let locked_value = get_path(&self.profile.locked, &path);
            let effective_value = get_path(&self.effective, &path);
            if locked_value.is_none() || locked_value != effective_value {
                anyhow::bail!("locked settings drift at \"{path}\"");
            }
        }
        Ok(())
    }
}

fn error_response(code: &str, err: &anyhow::Error) -> ControlResponse {
    ControlResponse::Error {
        code: code.to_string(),
        message: format!("{err:#}"),
    }
}
