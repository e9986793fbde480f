//! Host inspection: platform name, prompt defaults, and executable lookup.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Interpreter used to run the downstream entry point.
pub const INTERPRETER: &str = "python";

/// Executables that must resolve on `PATH` before a launch.
pub const REQUIRED_EXECUTABLES: [&str; 2] = [INTERPRETER, "git"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Name of the running OS in the form recorded in the config file.
pub fn platform_name() -> String {
    match std::env::consts::OS {
        "windows" => "Windows".to_string(),
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}

/// Prompt defaults derived from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostDefaults {
    pub parallel_processes: u32,
    pub temp_directory: String,
    pub platform_name: String,
}

impl HostDefaults {
    pub fn probe() -> Self {
        Self {
            parallel_processes: default_parallel_processes(Platform::current()),
            temp_directory: default_temp_directory(Platform::current()),
            platform_name: platform_name(),
        }
    }
}

/// One process per GPU: on Windows this asks `nvidia-smi`, anything that goes
/// wrong counts as no GPU. Other hosts assume a single device.
pub fn default_parallel_processes(platform: Platform) -> u32 {
    match platform {
        Platform::Windows => {
            let probe = Command::new("nvidia-smi")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match probe {
                Ok(status) if status.success() => 1,
                Ok(status) => {
                    debug!(%status, "nvidia-smi reported failure");
                    0
                }
                Err(e) => {
                    debug!(error = %e, "nvidia-smi not available");
                    0
                }
            }
        }
        Platform::Unix => 1,
    }
}

pub fn default_temp_directory(platform: Platform) -> String {
    let var = match platform {
        Platform::Windows => "TEMP",
        Platform::Unix => "TMPDIR",
    };
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback_temp_directory().to_string_lossy().into_owned())
}

fn fallback_temp_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("temp")
}

#[derive(Debug, thiserror::Error)]
#[error("{name} not found in PATH")]
pub struct MissingExecutable {
    pub name: String,
}

/// Check that every name resolves on `PATH`, failing on the first one that is
/// missing. The child is started by name, so the resolved paths are only logged.
pub fn require_executables(names: &[&str]) -> Result<(), MissingExecutable> {
    for name in names {
        let resolved = which::which(name).map_err(|_| MissingExecutable {
            name: (*name).to_string(),
        })?;
        debug!(name, path = %resolved.display(), "resolved executable");
    }
    Ok(())
}
