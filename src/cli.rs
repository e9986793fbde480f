use crate::storage::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "ai-scientist-launch",
    version,
    about = "Launch AI Scientist experiments from a saved configuration"
)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print the configuration summary and launch command before running
    #[arg(long)]
    pub debug: bool,
}
