use crate::cli::{Cli, Commands};
use crate::domain::constants::{
    STATUS_NO_CHANGES, STATUS_RESET, STATUS_SHUTDOWN, STATUS_UPDATED,
};
use crate::domain::models::{ControlRequest, ControlResponse, MutationOutcome, SetReport};
use crate::services::assignments::parse_assignments;
use crate::services::output::{print_one, print_settings};
use crate::services::transport::{request, RemoteError, TransportError};
use std::path::Path;

pub fn handle_runtime_commands(cli: &Cli, socket: &Path) -> anyhow::Result<()> {
    match &cli.command {
        Commands::ListSettings => {
            let settings = match request(socket, &ControlRequest::Get)? {
                ControlResponse::Settings { settings } => settings,
                other => return Err(unexpected(other).into()),
            };
            print_settings(cli.json, &settings)?;
        }
        Commands::Set { assignments } => {
            let changes = parse_assignments(assignments)?;
            let outcomes = match request(socket, &ControlRequest::Apply { changes })? {
                ControlResponse::Outcomes { outcomes, .. } => outcomes,
                ControlResponse::Error { code, message } => {
                    return Err(RemoteError { code, message }.into())
                }
                other => return Err(unexpected(other).into()),
            };
            let applied_any = outcomes
                .iter()
                .any(|outcome| matches!(outcome, MutationOutcome::Applied { .. }));
            let report = SetReport {
                status: if applied_any { "updated" } else { "no_changes" }.to_string(),
                outcomes,
            };
            print_one(cli.json, report, |r| {
                if r.status == "updated" {
                    STATUS_UPDATED.to_string()
                } else {
                    STATUS_NO_CHANGES.to_string()
                }
            })?;
        }
        Commands::FactoryReset => {
            expect_ack(request(socket, &ControlRequest::FactoryReset)?)?;
            print_one(cli.json, "reset", |_| STATUS_RESET.to_string())?;
        }
        Commands::Shutdown => {
            expect_ack(request(socket, &ControlRequest::Shutdown)?)?;
            print_one(cli.json, "shutting_down", |_| STATUS_SHUTDOWN.to_string())?;
        }
        Commands::Profile { .. } | Commands::Serve => {
            unreachable!("handled before runtime dispatch")
        }
    }
    Ok(())
}

fn expect_ack(response: ControlResponse) -> anyhow::Result<()> {
    match response {
        ControlResponse::Ack => Ok(()),
        ControlResponse::Error { code, message } => Err(RemoteError { code, message }.into()),
        other => Err(unexpected(other).into()),
    }
}

fn unexpected(response: ControlResponse) -> TransportError {
    TransportError::Protocol(format!("unexpected response from settings owner: {response:?}"))
}
