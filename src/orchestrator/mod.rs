//! Launch orchestration.
//!
//! Turns a saved configuration record into exactly one run of the downstream
//! experiment: environment overlay and command line are derived as plain
//! values, then handed to the controller, which owns the child process.

mod command;
mod controller;
mod environment;

pub use command::{build as build_command, model_argument, LaunchCommand, MissingModel, ENTRY_POINT};
pub use controller::{execute, run, LaunchError};
pub use environment::{derive as derive_environment, visible_devices, EnvOverlay};
