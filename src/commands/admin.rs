use crate::cli::{Cli, ProfileCommands};
use crate::domain::constants::STATUS_RELOADED;
use crate::domain::models::{ControlRequest, ControlResponse, LockedPathsReport};
use crate::services::locking::LockedPathIndex;
use crate::services::output::print_one;
use crate::services::owner::SettingsOwner;
use crate::services::profiles::read_deployment_profiles;
use crate::services::storage::AppPaths;
use crate::services::transport::{self, RemoteError, TransportError};
use std::path::Path;

/// Run the settings owner. A malformed profile aborts startup here: the
/// process must never serve mutations with ambiguous locking state.
pub fn handle_serve(paths: &AppPaths, socket: &Path) -> anyhow::Result<()> {
    let mut owner = SettingsOwner::bootstrap(paths.clone())?;
    transport::serve(socket, &mut owner)
}

pub fn handle_profile_commands(
    cli: &Cli,
    paths: &AppPaths,
    socket: &Path,
    command: &ProfileCommands,
) -> anyhow::Result<()> {
    match command {
        ProfileCommands::Show => {
            let profile = read_deployment_profiles(paths)?;
            print_one(cli.json, &profile, |p| {
                serde_json::to_string_pretty(p).unwrap_or_else(|_| p.fingerprint.clone())
            })?;
        }
        ProfileCommands::Locked => {
            let profile = read_deployment_profiles(paths)?;
            let index = LockedPathIndex::build(&profile.locked, &profile.fingerprint);
            let report = LockedPathsReport {
                fingerprint: index.fingerprint().to_string(),
                paths: index.paths(),
            };
            print_one(cli.json, report, |r| r.paths.join("\n"))?;
        }
        ProfileCommands::Reload => {
            match transport::request(socket, &ControlRequest::Reload)? {
                ControlResponse::Ack => {}
                ControlResponse::Error { code, message } => {
                    return Err(RemoteError { code, message }.into())
                }
                other => {
                    return Err(TransportError::Protocol(format!(
                        "unexpected response from settings owner: {other:?}"
                    ))
                    .into())
                }
            }
            print_one(cli.json, "reloaded", |_| STATUS_RELOADED.to_string())?;
        }
    }
    Ok(())
}
