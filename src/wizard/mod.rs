//! Interactive configuration wizard.
//!
//! The wizard walks three sections (provider, experiment, system), validating
//! each answer at the prompt, and writes the record only once every answer is
//! in. Prompt rendering sits behind [`Prompter`] so the flow does not depend on
//! a terminal.

mod terminal;

pub use terminal::TerminalPrompter;

use crate::host::HostDefaults;
use crate::model::{
    Config, CustomEndpoint, ExperimentConfig, ExperimentType, ProviderConfig, ProviderSettings,
    ProviderType, SystemConfig, DEFAULT_MAX_TOKENS, DEFAULT_NUM_IDEAS, DEFAULT_TEMPERATURE,
    SCHEMA_VERSION,
};
use crate::storage;
use crate::validate::{self, Validator};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// Ctrl-C or Esc at a prompt.
    #[error("configuration cancelled")]
    Cancelled,
    #[error("prompt failed: {0}")]
    Prompt(String),
    #[error("assembled configuration is invalid: {0}")]
    Invalid(#[from] crate::model::ConfigError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A free-text question with its default and validator.
pub struct TextField<'a> {
    pub message: &'a str,
    pub default: Option<String>,
    pub validator: Validator,
}

impl<'a> TextField<'a> {
    pub fn new(message: &'a str, validator: Validator) -> Self {
        Self {
            message,
            default: None,
            validator,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Blocking question/answer backend.
///
/// `text` must only return answers that pass the field's validator; invalid
/// input is re-asked inside the implementation.
pub trait Prompter {
    fn section(&mut self, title: &str) -> Result<(), WizardError>;
    fn text(&mut self, field: &TextField<'_>) -> Result<String, WizardError>;
    /// Returns the index of the chosen option.
    fn select(&mut self, message: &str, options: &[&str]) -> Result<usize, WizardError>;
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, WizardError>;
}

#[derive(Debug)]
pub enum Outcome {
    /// The user kept the record already on disk.
    Reused(Config),
    Saved(Config),
}

/// Run the wizard against the record at `path`.
pub fn run<P: Prompter>(
    prompter: &mut P,
    path: &Path,
    defaults: &HostDefaults,
) -> Result<Outcome, WizardError> {
    prompter.section("AI Scientist Configuration Wizard")?;

    match storage::load(path) {
        Ok(Some(existing)) => match existing.validate() {
            Ok(()) => {
                if prompter.confirm(
                    "Existing configuration found. Would you like to use it?",
                    true,
                )? {
                    info!(path = %path.display(), "keeping existing configuration");
                    return Ok(Outcome::Reused(existing));
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "existing configuration is invalid, rebuilding"),
        },
        Ok(None) => {}
        Err(e) => warn!(error = %format!("{e:#}"), "existing configuration is unreadable, rebuilding"),
    }

    let config = build(prompter, defaults)?;
    config.validate()?;
    storage::save(path, &config)?;
    Ok(Outcome::Saved(config))
}

/// Ask every question and assemble the record without touching disk.
pub fn build<P: Prompter>(prompter: &mut P, defaults: &HostDefaults) -> Result<Config, WizardError> {
    let llm_provider = configure_provider(prompter)?;
    let experiment = configure_experiment(prompter, defaults)?;
    let system = configure_system(prompter, defaults)?;
    Ok(Config {
        llm_provider,
        experiment,
        system,
        platform_name: defaults.platform_name.clone(),
        schema_version: SCHEMA_VERSION.to_string(),
    })
}

fn ask_parsed<P: Prompter, T: FromStr>(
    prompter: &mut P,
    field: &TextField<'_>,
) -> Result<T, WizardError> {
    let answer = prompter.text(field)?;
    answer
        .trim()
        .parse()
        .map_err(|_| WizardError::Prompt(format!("unusable answer {answer:?} for {:?}", field.message)))
}

fn configure_provider<P: Prompter>(prompter: &mut P) -> Result<ProviderConfig, WizardError> {
    prompter.section("LLM Provider Configuration")?;

    let labels = ProviderType::ALL.map(ProviderType::label);
    let provider_type = ProviderType::ALL[prompter.select("Select your LLM provider type", &labels)?];

    let settings = match provider_type.default_model() {
        Some(default_model) => {
            let model = prompter.text(
                &TextField::new("Enter the model name", validate::non_empty)
                    .with_default(default_model),
            )?;
            ProviderSettings {
                model_name: Some(model.trim().to_string()),
                custom: None,
            }
        }
        None => {
            let api_base_url = prompter.text(&TextField::new(
                "Enter your API base URL",
                validate::non_empty,
            ))?;
            let api_key = prompter.text(&TextField::new("Enter your API key", validate::api_key))?;
            let model_name = prompter.text(&TextField::new(
                "Enter your model name",
                validate::non_empty,
            ))?;
            let max_tokens = ask_parsed(
                prompter,
                &TextField::new("Enter maximum tokens supported", validate::positive)
                    .with_default(DEFAULT_MAX_TOKENS.to_string()),
            )?;
            let supports_functions =
                prompter.confirm("Does your model support OpenAI functions?", false)?;
            let temperature = ask_parsed(
                prompter,
                &TextField::new("Enter default temperature (0.0-1.0)", validate::temperature)
                    .with_default(DEFAULT_TEMPERATURE.to_string()),
            )?;
            ProviderSettings {
                model_name: Some(model_name.trim().to_string()),
                custom: Some(CustomEndpoint {
                    api_base_url: api_base_url.trim().to_string(),
                    api_key: api_key.trim().to_string(),
                    max_tokens,
                    supports_functions,
                    temperature,
                }),
            }
        }
    };

    Ok(ProviderConfig {
        provider_type,
        settings,
    })
}

fn configure_experiment<P: Prompter>(
    prompter: &mut P,
    defaults: &HostDefaults,
) -> Result<ExperimentConfig, WizardError> {
    prompter.section("Experiment Configuration")?;

    let num_ideas = ask_parsed(
        prompter,
        &TextField::new("Number of ideas to generate", validate::positive)
            .with_default(DEFAULT_NUM_IDEAS.to_string()),
    )?;
    let kinds = ExperimentType::ALL.map(ExperimentType::as_arg);
    let experiment_type = ExperimentType::ALL[prompter.select("Select experiment type", &kinds)?];
    let parallel_processes = ask_parsed(
        prompter,
        &TextField::new(
            "Number of parallel processes (0 for sequential)",
            validate::count,
        )
        .with_default(defaults.parallel_processes.to_string()),
    )?;
    let improvement_enabled = prompter.confirm("Enable improvement based on reviews?", true)?;

    Ok(ExperimentConfig {
        num_ideas,
        experiment_type,
        parallel_processes,
        improvement_enabled,
    })
}

fn configure_system<P: Prompter>(
    prompter: &mut P,
    defaults: &HostDefaults,
) -> Result<SystemConfig, WizardError> {
    prompter.section("System Configuration")?;

    let temp_directory = prompter.text(
        &TextField::new("Temporary directory path", validate::non_empty)
            .with_default(defaults.temp_directory.clone()),
    )?;
    let use_gpu = prompter.confirm("Use GPU if available?", true)?;

    Ok(SystemConfig {
        temp_directory: temp_directory.trim().to_string(),
        use_gpu,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_config;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    enum Answer {
        Text(&'static str),
        Default,
        Select(usize),
        Confirm(bool),
        Interrupt,
    }

    /// Replays canned answers; rejected text answers are counted and the next
    /// answer is tried, the way a user would retype.
    struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        rejected: Vec<(String, &'static str)>,
        sections: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                rejected: Vec::new(),
                sections: Vec::new(),
            }
        }

        fn next(&mut self, message: &str) -> Answer {
            self.answers
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted answer left for {message:?}"))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn section(&mut self, title: &str) -> Result<(), WizardError> {
            self.sections.push(title.to_string());
            Ok(())
        }

        fn text(&mut self, field: &TextField<'_>) -> Result<String, WizardError> {
            loop {
                let input = match self.next(field.message) {
                    Answer::Text(t) => t.to_string(),
                    Answer::Default => field.default.clone().unwrap_or_default(),
                    Answer::Interrupt => return Err(WizardError::Cancelled),
                    other => panic!("expected text answer for {:?}, got {other:?}", field.message),
                };
                match (field.validator)(&input) {
                    Ok(()) => return Ok(input),
                    Err(msg) => self.rejected.push((input, msg)),
                }
            }
        }

        fn select(&mut self, message: &str, options: &[&str]) -> Result<usize, WizardError> {
            match self.next(message) {
                Answer::Select(i) => {
                    assert!(i < options.len());
                    Ok(i)
                }
                Answer::Interrupt => Err(WizardError::Cancelled),
                other => panic!("expected selection for {message:?}, got {other:?}"),
            }
        }

        fn confirm(&mut self, message: &str, default: bool) -> Result<bool, WizardError> {
            match self.next(message) {
                Answer::Confirm(b) => Ok(b),
                Answer::Default => Ok(default),
                Answer::Interrupt => Err(WizardError::Cancelled),
                other => panic!("expected confirmation for {message:?}, got {other:?}"),
            }
        }
    }

    fn defaults() -> HostDefaults {
        HostDefaults {
            parallel_processes: 1,
            temp_directory: "/var/tmp/scientist".into(),
            platform_name: "Linux".into(),
        }
    }

    fn experiment_and_system_defaults() -> Vec<Answer> {
        vec![
            Answer::Default,   // num ideas
            Answer::Select(0), // nanoGPT
            Answer::Default,   // parallel
            Answer::Default,   // improvement
            Answer::Default,   // temp dir
            Answer::Default,   // gpu
        ]
    }

    #[test]
    fn builtin_provider_with_defaults() {
        let mut answers = vec![Answer::Select(1), Answer::Default];
        answers.extend(experiment_and_system_defaults());
        let mut prompter = ScriptedPrompter::new(answers);

        let cfg = build(&mut prompter, &defaults()).unwrap();
        assert_eq!(cfg.llm_provider.provider_type, ProviderType::Anthropic);
        assert_eq!(cfg.model_name(), Some("claude-3-5-sonnet-20240620"));
        assert!(cfg.custom_endpoint().is_none());
        assert_eq!(cfg.experiment.num_ideas, 50);
        assert_eq!(cfg.experiment.parallel_processes, 1);
        assert!(cfg.experiment.improvement_enabled);
        assert_eq!(cfg.system.temp_directory, "/var/tmp/scientist");
        assert!(cfg.system.use_gpu);
        assert_eq!(cfg.platform_name, "Linux");
        assert_eq!(cfg.schema_version, "1.0");
        assert!(cfg.validate().is_ok());
        assert_eq!(
            prompter.sections,
            [
                "LLM Provider Configuration",
                "Experiment Configuration",
                "System Configuration"
            ]
        );
    }

    #[test]
    fn custom_provider_reprompts_until_valid() {
        let mut answers = vec![
            Answer::Select(2),
            Answer::Text("   "),
            Answer::Text("http://localhost:8000/v1"),
            Answer::Text("short"),
            Answer::Text("sk-0123456789abcdef"),
            Answer::Text("foo"),
            Answer::Text("lots"),
            Answer::Text("0"),
            Answer::Default,
            Answer::Confirm(true),
            Answer::Text("hot"),
            Answer::Text("1.5"),
            Answer::Text("0.2"),
        ];
        answers.extend(experiment_and_system_defaults());
        let mut prompter = ScriptedPrompter::new(answers);

        let cfg = build(&mut prompter, &defaults()).unwrap();
        let endpoint = cfg.custom_endpoint().unwrap();
        assert_eq!(endpoint.api_base_url, "http://localhost:8000/v1");
        assert_eq!(endpoint.api_key, "sk-0123456789abcdef");
        assert_eq!(endpoint.max_tokens, 8192);
        assert!(endpoint.supports_functions);
        assert!((endpoint.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(cfg.model_name(), Some("foo"));
        assert!(cfg.validate().is_ok());

        let rejected: Vec<&str> = prompter.rejected.iter().map(|(i, _)| i.as_str()).collect();
        assert_eq!(rejected, ["   ", "short", "lots", "0", "hot", "1.5"]);
    }

    #[test]
    fn experiment_answers_are_validated() {
        let answers = vec![
            Answer::Select(0),
            Answer::Text("gpt-4o"),
            Answer::Text("0"),
            Answer::Text("12"),
            Answer::Select(1),
            Answer::Text("-2"),
            Answer::Text("0"),
            Answer::Confirm(false),
            Answer::Text(" "),
            Answer::Text("/scratch"),
            Answer::Confirm(false),
        ];
        let mut prompter = ScriptedPrompter::new(answers);

        let cfg = build(&mut prompter, &defaults()).unwrap();
        assert_eq!(cfg.experiment.num_ideas, 12);
        assert_eq!(cfg.experiment.experiment_type, ExperimentType::NanoGptLite);
        assert_eq!(cfg.experiment.parallel_processes, 0);
        assert!(!cfg.experiment.improvement_enabled);
        assert_eq!(cfg.system.temp_directory, "/scratch");
        assert!(!cfg.system.use_gpu);
        assert_eq!(prompter.rejected.len(), 3);
    }

    #[test]
    fn run_saves_new_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("ai_scientist_config.json");
        let mut answers = vec![Answer::Select(0), Answer::Text("nanoGPT")];
        answers.extend(experiment_and_system_defaults());
        let mut prompter = ScriptedPrompter::new(answers);

        let outcome = run(&mut prompter, &path, &defaults()).unwrap();
        let Outcome::Saved(cfg) = outcome else {
            panic!("expected a saved record");
        };
        assert_eq!(storage::load(&path).unwrap(), Some(cfg));
    }

    #[test]
    fn run_reuses_existing_record_without_prompting_further() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        storage::save(&path, &sample_config()).unwrap();
        let mut prompter = ScriptedPrompter::new([Answer::Default]);

        let outcome = run(&mut prompter, &path, &defaults()).unwrap();
        assert!(matches!(outcome, Outcome::Reused(cfg) if cfg == sample_config()));
        assert!(prompter.answers.is_empty());
        assert_eq!(prompter.sections, ["AI Scientist Configuration Wizard"]);
    }

    #[test]
    fn run_rebuilds_when_existing_record_declined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        storage::save(&path, &sample_config()).unwrap();
        let mut answers = vec![Answer::Confirm(false), Answer::Select(1), Answer::Text("claude")];
        answers.extend(experiment_and_system_defaults());
        let mut prompter = ScriptedPrompter::new(answers);

        let Outcome::Saved(cfg) = run(&mut prompter, &path, &defaults()).unwrap() else {
            panic!("expected a rebuilt record");
        };
        assert_eq!(cfg.model_name(), Some("claude"));
        assert_eq!(storage::load(&path).unwrap(), Some(cfg));
    }

    #[test]
    fn unreadable_record_is_rebuilt_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, "not json").unwrap();
        let mut answers = vec![Answer::Select(0), Answer::Default];
        answers.extend(experiment_and_system_defaults());
        let mut prompter = ScriptedPrompter::new(answers);

        assert!(matches!(
            run(&mut prompter, &path, &defaults()).unwrap(),
            Outcome::Saved(_)
        ));
    }

    #[test]
    fn interrupt_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("ai_scientist_config.json");
        let answers = vec![
            Answer::Select(2),
            Answer::Text("http://localhost:8000/v1"),
            Answer::Interrupt,
        ];
        let mut prompter = ScriptedPrompter::new(answers);

        let err = run(&mut prompter, &path, &defaults()).unwrap_err();
        assert!(matches!(err, WizardError::Cancelled));
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }
}
