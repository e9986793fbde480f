//! Launch lifecycle controller.
//!
//! Runs the fixed sequence: prerequisites, load, derive, build, execute. Each
//! invocation is a single attempt.

use super::command::{self, LaunchCommand, MissingModel};
use super::environment::{self, EnvOverlay};
use crate::cli::Cli;
use crate::host::{self, MissingExecutable, Platform, REQUIRED_EXECUTABLES};
use crate::model::ConfigError;
use crate::storage;
use crate::text_summary::build_text_summary;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Error: {0}")]
    MissingExecutable(#[from] MissingExecutable),
    #[error("Configuration not found at {}. Please run ai-scientist-config first.", .0.display())]
    MissingConfig(PathBuf),
    #[error("Error: could not load configuration: {0:#}")]
    UnreadableConfig(anyhow::Error),
    #[error("Error: invalid configuration {}: {source}", .path.display())]
    InvalidConfig { path: PathBuf, source: ConfigError },
    #[error("Error: {0}")]
    MissingModel(#[from] MissingModel),
    #[error("Error starting AI Scientist: {0}")]
    Spawn(std::io::Error),
    #[error("Error installing interrupt handler: {0}")]
    Signal(std::io::Error),
    #[error("Error running AI Scientist: command `{command}` {status}")]
    Failed {
        command: LaunchCommand,
        status: ExitStatus,
    },
    #[error("Experiment cancelled by user.")]
    Interrupted,
}

/// Validate, load, derive, build and run. Returns once the child has exited.
pub async fn run(args: &Cli) -> Result<(), LaunchError> {
    host::require_executables(&REQUIRED_EXECUTABLES)?;

    let config = storage::load(&args.config)
        .map_err(LaunchError::UnreadableConfig)?
        .ok_or_else(|| LaunchError::MissingConfig(args.config.clone()))?;
    config
        .validate()
        .map_err(|source| LaunchError::InvalidConfig {
            path: args.config.clone(),
            source,
        })?;

    let env = environment::derive(&config, Platform::current());
    let cmd = command::build(&config)?;

    if args.debug {
        for line in build_text_summary(&config).lines {
            println!("{line}");
        }
        println!("Debug: Launch command: {cmd}");
    }

    execute(&cmd, &env).await
}

/// How long a failed child waits for a pending Ctrl-C to be noticed. A
/// terminal interrupt reaches the whole foreground group, so the child often
/// exits before the launcher's own signal is polled.
const INTERRUPT_GRACE: Duration = Duration::from_millis(100);

/// Ctrl-C listener, installed before the child is spawned so an early
/// interrupt is queued rather than killing the launcher outright.
struct Interrupt {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
    #[cfg(windows)]
    inner: tokio::signal::windows::CtrlC,
}

impl Interrupt {
    fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        let inner = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let inner = tokio::signal::windows::ctrl_c()?;
        Ok(Self { inner })
    }

    async fn recv(&mut self) -> Option<()> {
        self.inner.recv().await
    }
}

/// Spawn `cmd` with `env` layered over the inherited environment and wait.
/// Ctrl-C kills and reaps the child before reporting the interrupt.
pub async fn execute(cmd: &LaunchCommand, env: &EnvOverlay) -> Result<(), LaunchError> {
    debug!(vars = ?env.keys().collect::<Vec<_>>(), "environment overlay");
    info!(program = %cmd.program, "starting experiment");

    let mut interrupt = Interrupt::install().map_err(LaunchError::Signal)?;

    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .envs(env)
        .kill_on_drop(true)
        .spawn()
        .map_err(LaunchError::Spawn)?;

    let status = tokio::select! {
        biased;
        _ = interrupt.recv() => {
            if let Err(e) = child.start_kill() {
                debug!(error = %e, "failed to kill experiment");
            }
            if let Err(e) = child.wait().await {
                debug!(error = %e, "failed to reap experiment");
            }
            return Err(LaunchError::Interrupted);
        }
        status = child.wait() => status.map_err(LaunchError::Spawn)?,
    };

    debug!(%status, "experiment exited");
    if status.success() {
        return Ok(());
    }
    if let Ok(Some(())) = tokio::time::timeout(INTERRUPT_GRACE, interrupt.recv()).await {
        debug!(%status, "experiment exited on interrupt");
        return Err(LaunchError::Interrupted);
    }
    Err(LaunchError::Failed {
        command: cmd.clone(),
        status,
    })
}
