//! Trial configuration: model identifiers and sampling knobs.

use crate::prompts::DEFAULT_PARAPHRASE_PREFIX;
use crate::trial::Backend;

/// Fixed inputs for one orchestrator instance.
///
/// The core treats these as constants per call; where they come from
/// (environment, config file, test fixture) is the caller's business.
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Model id for backend Alpha.
    pub alpha_model: String,
    /// Model id for backend Beta.
    pub beta_model: String,
    /// Model id for the style-paraphrasing backend.
    pub paraphrase_model: String,
    /// Sampling temperature for generation calls.
    pub generation_temperature: f32,
    /// Sampling temperature for paraphrase calls.
    pub paraphrase_temperature: f32,
    /// Max output tokens for every outbound call.
    pub max_output_tokens: u32,
    /// Instruction prefix for the paraphrase transform.
    pub paraphrase_prefix: String,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            alpha_model: "openai/o3".into(),
            beta_model: "openai/gpt-5".into(),
            paraphrase_model: "anthropic/claude-opus-4.1".into(),
            generation_temperature: 0.2,
            paraphrase_temperature: 0.2,
            max_output_tokens: 1024,
            paraphrase_prefix: DEFAULT_PARAPHRASE_PREFIX.into(),
        }
    }
}

impl TrialConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            alpha_model: std::env::var("BLINDFOLD_MODEL_A").unwrap_or(defaults.alpha_model),
            beta_model: std::env::var("BLINDFOLD_MODEL_B").unwrap_or(defaults.beta_model),
            paraphrase_model: std::env::var("BLINDFOLD_PARAPHRASE_MODEL")
                .unwrap_or(defaults.paraphrase_model),
            generation_temperature: env_parsed(
                "BLINDFOLD_TEMPERATURE",
                defaults.generation_temperature,
            ),
            paraphrase_temperature: env_parsed(
                "BLINDFOLD_PARAPHRASE_TEMPERATURE",
                defaults.paraphrase_temperature,
            ),
            max_output_tokens: env_parsed(
                "BLINDFOLD_MAX_OUTPUT_TOKENS",
                defaults.max_output_tokens,
            ),
            paraphrase_prefix: std::env::var("BLINDFOLD_PARAPHRASE_PREFIX")
                .unwrap_or(defaults.paraphrase_prefix),
        }
    }

    /// Model id for a given generation backend.
    pub fn model_for(&self, backend: Backend) -> &str {
        match backend {
            Backend::Alpha => &self.alpha_model,
            Backend::Beta => &self.beta_model,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
