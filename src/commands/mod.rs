//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `admin.rs` — serve + profile inspection/reload command trees.
//! - `runtime.rs` — list-settings/set/factory-reset/shutdown.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod runtime;

pub use admin::{handle_profile_commands, handle_serve};
pub use runtime::handle_runtime_commands;
