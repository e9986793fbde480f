//! Text summary builder for a configuration record.
//!
//! Formats human-readable lines shown after the wizard saves and by the
//! launcher in debug mode.

use crate::model::Config;

/// Pre-formatted lines for text output.
pub struct TextSummary {
    pub lines: Vec<String>,
}

/// Keep the last four characters of a secret, hide the rest.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.trim().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn build_text_summary(config: &Config) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("Provider: {}", config.llm_provider.provider_type));
    if let Some(model) = config.model_name() {
        lines.push(format!("Model: {model}"));
    }
    if let Some(endpoint) = config.custom_endpoint() {
        lines.push(format!("API base URL: {}", endpoint.api_base_url));
        lines.push(format!("API key: {}", mask_secret(&endpoint.api_key)));
        lines.push(format!(
            "Max tokens: {}  Temperature: {:.2}  Functions: {}",
            endpoint.max_tokens,
            endpoint.temperature,
            yes_no(endpoint.supports_functions)
        ));
    }

    let exp = &config.experiment;
    lines.push(format!(
        "Experiment: {} ({} ideas, {} parallel, improvement {})",
        exp.experiment_type,
        exp.num_ideas,
        exp.parallel_processes,
        yes_no(exp.improvement_enabled)
    ));
    lines.push(format!(
        "Temp directory: {}  GPU: {}",
        config.system.temp_directory,
        yes_no(config.system.use_gpu)
    ));
    if !config.platform_name.is_empty() {
        lines.push(format!("Platform: {}", config.platform_name));
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{sample_config, sample_custom_config};

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask_secret("sk-0123456789abcdef"), "***************cdef");
        assert_eq!(mask_secret("abc"), "***");
    }

    #[test]
    fn custom_summary_never_shows_the_key() {
        let summary = build_text_summary(&sample_custom_config());
        let text = summary.lines.join("\n");
        assert!(!text.contains("sk-0123456789abcdef"));
        assert!(text.contains("API base URL: http://localhost:8000/v1"));
        assert!(text.contains("Model: foo"));
    }

    #[test]
    fn builtin_summary_has_no_endpoint_lines() {
        let summary = build_text_summary(&sample_config());
        assert_eq!(summary.lines[0], "Provider: OpenAI Compatible");
        assert!(summary.lines.iter().all(|l| !l.starts_with("API")));
        assert!(summary
            .lines
            .contains(&"Experiment: nanoGPT (50 ideas, 0 parallel, improvement yes)".to_string()));
    }
}
