use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prefctl", version, about = "Control CLI for the prefctl settings owner")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Control socket of the settings owner (overrides PREFCTL_SOCKET and config.toml)"
    )]
    pub socket: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current effective settings.
    ListSettings,
    /// Propose one or more settings changes.
    Set {
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "--dotted.path=value"
        )]
        assignments: Vec<String>,
    },
    /// Drop every user override and revert to profile-driven settings.
    FactoryReset,
    /// Ask the settings owner to exit cleanly.
    Shutdown,
    /// Inspect or reload the deployment profiles.
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Run the settings owner on the control socket.
    Serve,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the merged deployment profile (no owner required).
    Show,
    /// List the locked field paths (no owner required).
    Locked,
    /// Tell the running settings owner to re-read profile sources.
    Reload,
}
