//! Locked-settings enforcement: deployment profile reading, deep merge with
//! locked-wins precedence, a locked-path index, mutation validation, and the
//! settings owner + control channel the `prefctl` binary exposes.

pub mod cli;
pub mod commands;
pub mod domain;
pub mod services;
pub mod settings;
