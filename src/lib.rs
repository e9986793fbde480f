//! Configuration wizard and launcher for AI Scientist experiments.
//!
//! `ai-scientist-config` writes the configuration record interactively;
//! `ai-scientist-launch` reads it and starts the experiment process.

pub mod cli;
pub mod host;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod storage;
pub mod text_summary;
pub mod validate;
pub mod wizard;
