//! Command line for the downstream experiment process.

use crate::host::INTERPRETER;
use crate::model::Config;
use std::fmt;

/// Script the interpreter runs.
pub const ENTRY_POINT: &str = "launch_scientist.py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("configuration has no model name")]
pub struct MissingModel;

/// Model identifier passed to `--model`; custom endpoints are namespaced.
pub fn model_argument(config: &Config) -> Result<String, MissingModel> {
    let name = config
        .model_name()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(MissingModel)?;
    if config.is_custom() {
        Ok(format!("custom/{name}"))
    } else {
        Ok(name.to_string())
    }
}

pub fn build(config: &Config) -> Result<LaunchCommand, MissingModel> {
    let exp = &config.experiment;
    let mut args = vec![
        ENTRY_POINT.to_string(),
        "--model".to_string(),
        model_argument(config)?,
        "--experiment".to_string(),
        exp.experiment_type.as_arg().to_string(),
        "--num-ideas".to_string(),
        exp.num_ideas.to_string(),
        "--parallel".to_string(),
        exp.parallel_processes.to_string(),
    ];
    if exp.improvement_enabled {
        args.push("--improvement".to_string());
    }
    Ok(LaunchCommand {
        program: INTERPRETER.to_string(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{sample_config, sample_custom_config};

    #[test]
    fn builtin_provider_command_line() {
        let cmd = build(&sample_config()).unwrap();
        assert_eq!(
            cmd.to_string(),
            "python launch_scientist.py --model nanoGPT --experiment nanoGPT --num-ideas 50 --parallel 0 --improvement"
        );
    }

    #[test]
    fn custom_model_is_namespaced() {
        let cfg = sample_custom_config();
        assert_eq!(model_argument(&cfg).unwrap(), "custom/foo");
        let cmd = build(&cfg).unwrap();
        assert_eq!(cmd.args[1..3], ["--model".to_string(), "custom/foo".to_string()]);
    }

    #[test]
    fn improvement_flag_is_optional() {
        let mut cfg = sample_config();
        cfg.experiment.improvement_enabled = false;
        cfg.experiment.parallel_processes = 2;
        let cmd = build(&cfg).unwrap();
        assert_eq!(cmd.args.last().map(String::as_str), Some("2"));
        assert!(!cmd.args.iter().any(|a| a == "--improvement"));
    }

    #[test]
    fn missing_model_is_an_error() {
        let mut cfg = sample_config();
        cfg.llm_provider.settings.model_name = None;
        assert_eq!(build(&cfg), Err(MissingModel));
    }
}
