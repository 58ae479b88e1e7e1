use clap::Parser;
use prefctl::cli::{Cli, Commands};
use prefctl::commands::{handle_profile_commands, handle_runtime_commands, handle_serve};
use prefctl::domain::constants::{
    CODE_BAD_REQUEST, CODE_INTERNAL, CODE_PROFILE_READ_ERROR, CODE_TRANSPORT_UNAVAILABLE,
};
use prefctl::services::assignments::AssignmentError;
use prefctl::services::output::print_failure;
use prefctl::services::profiles::ProfileError;
use prefctl::services::storage::{resolve_socket, AppPaths};
use prefctl::services::transport::{RemoteError, TransportError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        let (code, message) = classify(&err);
        print_failure(cli.json, &code, &message);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let paths = AppPaths::from_env()?;
    let socket = resolve_socket(&paths, cli.socket.as_deref())?;

    match &cli.command {
        Commands::Serve => handle_serve(&paths, &socket),
        Commands::Profile { command } => handle_profile_commands(cli, &paths, &socket, command),
        _ => handle_runtime_commands(cli, &socket),
    }
}

/// Map a failure to its envelope code. Every recoverable kind stays
/// distinguishable at the boundary; anything unrecognized is internal.
/// Locked-field and invalid-settings failures arrive as `RemoteError`s
/// carrying the owner's code and pre-rendered contract lines.
fn classify(err: &anyhow::Error) -> (String, String) {
    if let Some(remote) = err.downcast_ref::<RemoteError>() {
        return (remote.code.clone(), remote.message.clone());
    }
    if let Some(profile) = err.downcast_ref::<ProfileError>() {
        return (CODE_PROFILE_READ_ERROR.to_string(), profile.to_string());
    }
    if let Some(transport) = err.downcast_ref::<TransportError>() {
        let code = match transport {
            TransportError::Unavailable { .. } => CODE_TRANSPORT_UNAVAILABLE,
            TransportError::Protocol(_) => CODE_INTERNAL,
        };
        return (code.to_string(), transport.to_string());
    }
    if let Some(assignment) = err.downcast_ref::<AssignmentError>() {
        return (CODE_BAD_REQUEST.to_string(), assignment.to_string());
    }
    (CODE_INTERNAL.to_string(), format!("{err:#}"))
}
