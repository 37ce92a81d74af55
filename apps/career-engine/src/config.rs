use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Decision thresholds for the engine. Every field has a working default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum phase completeness for a Good/Excellent turn to advance.
    pub ready_completeness: f64,
    /// Experience count that forces a jump to Synthesis.
    pub force_min_experiences: usize,
    /// Experience count that forces the jump when their mean confidence is
    /// above `force_confidence`.
    pub force_high_confidence_experiences: usize,
    pub force_confidence: f64,
    pub min_input_chars: usize,
    pub max_input_chars: usize,
    /// Run the scorer and extractor on separate threads.
    pub parallel_analysis: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ready_completeness: 0.6,
            force_min_experiences: 3,
            force_high_confidence_experiences: 2,
            force_confidence: 0.8,
            min_input_chars: 3,
            max_input_chars: 5000,
            parallel_analysis: false,
        }
    }
}

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    /// Augmentation is disabled when unset.
    pub anthropic_api_key: Option<String>,
    pub augment_model: String,
    pub augment_timeout_ms: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            ready_completeness: env_or("ENGINE_READY_COMPLETENESS", defaults.ready_completeness)?,
            force_min_experiences: env_or(
                "ENGINE_FORCE_MIN_EXPERIENCES",
                defaults.force_min_experiences,
            )?,
            force_high_confidence_experiences: env_or(
                "ENGINE_FORCE_HIGH_CONFIDENCE_EXPERIENCES",
                defaults.force_high_confidence_experiences,
            )?,
            force_confidence: env_or("ENGINE_FORCE_CONFIDENCE", defaults.force_confidence)?,
            min_input_chars: env_or("ENGINE_MIN_INPUT_CHARS", defaults.min_input_chars)?,
            max_input_chars: env_or("ENGINE_MAX_INPUT_CHARS", defaults.max_input_chars)?,
            parallel_analysis: env_or("ENGINE_PARALLEL_ANALYSIS", defaults.parallel_analysis)?,
        };

        Ok(Config {
            engine,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            augment_model: std::env::var("AUGMENT_MODEL")
                .unwrap_or_else(|_| crate::augment::DEFAULT_MODEL.to_string()),
            augment_timeout_ms: env_or("AUGMENT_TIMEOUT_MS", 4000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
