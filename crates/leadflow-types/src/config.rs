//! Global configuration types for Leadflow.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls
//! classifier strategy, prompt size caps, and the session snapshot interval.

use serde::{Deserialize, Serialize};

/// Top-level configuration for Leadflow.
///
/// Loaded from `~/.leadflow/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Classifier strategy and prompt shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Prefer the LLM classifier when one is configured.
    #[serde(default)]
    pub prefer_llm: bool,

    /// Fall back to the heuristic when the LLM classifier errors.
    #[serde(default = "default_true")]
    pub fallback_on_error: bool,

    /// Model identifier sent to the LLM provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum completion tokens requested per classification.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Hard cap on total prompt length in characters.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Maximum number of transcript messages included in the prompt.
    #[serde(default = "default_max_prompt_messages")]
    pub max_prompt_messages: usize,

    /// Maximum length of a single transcript message in the prompt.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_max_prompt_chars() -> usize {
    12_000
}

fn default_max_prompt_messages() -> usize {
    50
}

fn default_max_message_chars() -> usize {
    500
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            prefer_llm: false,
            fallback_on_error: true,
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_prompt_chars: default_max_prompt_chars(),
            max_prompt_messages: default_max_prompt_messages(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

/// Session snapshot policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds between periodic session snapshots.
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,
}

fn default_snapshot_interval_secs() -> u64 {
    3_600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            snapshot_interval_secs: default_snapshot_interval_secs(),
        }
    }
}
