use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Schema version written into every record.
pub const SCHEMA_VERSION: &str = "1.0";

pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_NUM_IDEAS: u32 = 50;

/// Minimum API key length (exclusive) after trimming whitespace.
pub const MIN_API_KEY_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "OpenAI Compatible")]
    OpenAiCompatible,
    #[serde(rename = "Anthropic")]
    Anthropic,
    #[serde(rename = "Custom Provider")]
    Custom,
}

impl ProviderType {
    pub const ALL: [ProviderType; 3] = [
        ProviderType::OpenAiCompatible,
        ProviderType::Anthropic,
        ProviderType::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProviderType::OpenAiCompatible => "OpenAI Compatible",
            ProviderType::Anthropic => "Anthropic",
            ProviderType::Custom => "Custom Provider",
        }
    }

    /// Model offered as the prompt default for the built-in providers.
    pub fn default_model(self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAiCompatible => Some("gpt-4o-2024-05-13"),
            ProviderType::Anthropic => Some("claude-3-5-sonnet-20240620"),
            ProviderType::Custom => None,
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperimentType {
    #[serde(rename = "nanoGPT")]
    NanoGpt,
    #[serde(rename = "nanoGPT_lite")]
    NanoGptLite,
    #[serde(rename = "custom")]
    Custom,
}

impl ExperimentType {
    pub const ALL: [ExperimentType; 3] = [
        ExperimentType::NanoGpt,
        ExperimentType::NanoGptLite,
        ExperimentType::Custom,
    ];

    /// Name passed to the downstream `--experiment` flag.
    pub fn as_arg(self) -> &'static str {
        match self {
            ExperimentType::NanoGpt => "nanoGPT",
            ExperimentType::NanoGptLite => "nanoGPT_lite",
            ExperimentType::Custom => "custom",
        }
    }
}

impl fmt::Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Endpoint settings that only exist for [`ProviderType::Custom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEndpoint {
    pub api_base_url: String,
    pub api_key: String,
    #[serde(deserialize_with = "lenient::u32")]
    pub max_tokens: u32,
    #[serde(default)]
    pub supports_functions: bool,
    #[serde(deserialize_with = "lenient::f64")]
    pub temperature: f64,
}

/// Endpoint keys sit beside `model_name` in the `settings` object. Loading
/// fails on a malformed value or on an endpoint block missing required keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProviderSettings")]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(flatten)]
    pub custom: Option<CustomEndpoint>,
}

#[derive(Deserialize)]
struct RawProviderSettings {
    #[serde(default)]
    model_name: Option<String>,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    max_tokens: Option<u32>,
    #[serde(default)]
    supports_functions: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("incomplete custom endpoint settings, missing {}", .missing.join(", "))]
pub struct IncompleteEndpoint {
    pub missing: Vec<&'static str>,
}

impl TryFrom<RawProviderSettings> for ProviderSettings {
    type Error = IncompleteEndpoint;

    fn try_from(raw: RawProviderSettings) -> Result<Self, Self::Error> {
        let any_endpoint_key = raw.api_base_url.is_some()
            || raw.api_key.is_some()
            || raw.max_tokens.is_some()
            || raw.supports_functions.is_some()
            || raw.temperature.is_some();
        if !any_endpoint_key {
            return Ok(Self {
                model_name: raw.model_name,
                custom: None,
            });
        }

        match (raw.api_base_url, raw.api_key, raw.max_tokens, raw.temperature) {
            (Some(api_base_url), Some(api_key), Some(max_tokens), Some(temperature)) => Ok(Self {
                model_name: raw.model_name,
                custom: Some(CustomEndpoint {
                    api_base_url,
                    api_key,
                    max_tokens,
                    supports_functions: raw.supports_functions.unwrap_or(false),
                    temperature,
                }),
            }),
            (api_base_url, api_key, max_tokens, temperature) => {
                let missing = [
                    ("api_base_url", api_base_url.is_none()),
                    ("api_key", api_key.is_none()),
                    ("max_tokens", max_tokens.is_none()),
                    ("temperature", temperature.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                Err(IncompleteEndpoint { missing })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    #[serde(default)]
    pub settings: ProviderSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(deserialize_with = "lenient::u32")]
    pub num_ideas: u32,
    pub experiment_type: ExperimentType,
    #[serde(deserialize_with = "lenient::u32")]
    pub parallel_processes: u32,
    #[serde(default = "default_true")]
    pub improvement_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub temp_directory: String,
    #[serde(default = "default_true")]
    pub use_gpu: bool,
}

/// The persisted configuration record shared by the wizard and the launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub llm_provider: ProviderConfig,
    pub experiment: ExperimentConfig,
    pub system: SystemConfig,
    #[serde(rename = "platform", default)]
    pub platform_name: String,
    #[serde(rename = "version")]
    pub schema_version: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("custom provider settings are missing")]
    MissingCustomSettings,
    #[error("custom endpoint settings are only valid for the custom provider, found {0}")]
    UnexpectedCustomSettings(ProviderType),
    #[error("model name must not be empty")]
    EmptyModelName,
    #[error("API base URL must not be empty")]
    EmptyApiBaseUrl,
    #[error("API key must be longer than 10 characters")]
    ApiKeyTooShort,
    #[error("max tokens must be greater than zero")]
    ZeroMaxTokens,
    #[error("temperature {0} is outside 0.0-1.0")]
    TemperatureOutOfRange(f64),
    #[error("number of ideas must be greater than zero")]
    ZeroIdeas,
    #[error("temporary directory must not be empty")]
    EmptyTempDirectory,
    #[error("unsupported configuration version {0:?}, expected \"1.0\"")]
    UnsupportedVersion(String),
}

impl Config {
    pub fn is_custom(&self) -> bool {
        self.llm_provider.provider_type == ProviderType::Custom
    }

    pub fn model_name(&self) -> Option<&str> {
        self.llm_provider.settings.model_name.as_deref()
    }

    pub fn custom_endpoint(&self) -> Option<&CustomEndpoint> {
        self.llm_provider.settings.custom.as_ref()
    }

    /// Check every field constraint; the first violation wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.schema_version.clone()));
        }

        match (self.is_custom(), self.custom_endpoint()) {
            (true, None) => return Err(ConfigError::MissingCustomSettings),
            (false, Some(_)) => {
                return Err(ConfigError::UnexpectedCustomSettings(
                    self.llm_provider.provider_type,
                ))
            }
            (true, Some(endpoint)) => {
                if self.model_name().map_or(true, |m| m.trim().is_empty()) {
                    return Err(ConfigError::EmptyModelName);
                }
                if endpoint.api_base_url.trim().is_empty() {
                    return Err(ConfigError::EmptyApiBaseUrl);
                }
                if endpoint.api_key.trim().len() <= MIN_API_KEY_LEN {
                    return Err(ConfigError::ApiKeyTooShort);
                }
                if endpoint.max_tokens == 0 {
                    return Err(ConfigError::ZeroMaxTokens);
                }
                if !(0.0..=1.0).contains(&endpoint.temperature) {
                    return Err(ConfigError::TemperatureOutOfRange(endpoint.temperature));
                }
            }
            (false, None) => {
                if self.model_name().is_some_and(|m| m.trim().is_empty()) {
                    return Err(ConfigError::EmptyModelName);
                }
            }
        }

        if self.experiment.num_ideas == 0 {
            return Err(ConfigError::ZeroIdeas);
        }
        if self.system.temp_directory.trim().is_empty() {
            return Err(ConfigError::EmptyTempDirectory);
        }
        Ok(())
    }
}

/// Numeric fields accept either JSON numbers or numeric strings, since
/// older wizard versions saved raw prompt answers.
mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        String(String),
    }

    pub fn u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        match NumberOrString::<u32>::deserialize(d)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match NumberOrString::<f64>::deserialize(d)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        u32(d).map(Some)
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        f64(d).map(Some)
    }
}
