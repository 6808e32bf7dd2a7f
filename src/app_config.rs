use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Application configuration module
/// This module handles loading and validating the configuration that is
/// threaded explicitly into the translation client and the pipeline.
/// Environment variable holding the translation service credential
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable selecting the model
pub const ENV_MODEL: &str = "OPENAI_MODEL";
/// Environment variable overriding the API endpoint
pub const ENV_ENDPOINT: &str = "OPENAI_ENDPOINT";
/// Environment variable setting the chunk token budget
pub const ENV_MAX_CHUNK_TOKENS: &str = "MAX_CHUNK_TOKENS";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4";
/// Token budget used when none is configured
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 600;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// API key for the translation service
    pub api_key: String,

    /// Model name used for translation
    pub model: String,

    /// Optional API endpoint override (empty means the public endpoint)
    #[serde(default)]
    pub endpoint: String,

    /// Maximum number of tokens accumulated into one translation chunk
    pub max_chunk_tokens: usize,
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// A missing API key is fatal; the model and the token budget fall back
    /// to defaults when unset.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup.
    ///
    /// This is the seam used by tests so they do not have to mutate the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config(format!("Missing environment variable: {}", ENV_API_KEY))
            })?;

        let model = lookup(ENV_MODEL)
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let endpoint = lookup(ENV_ENDPOINT).unwrap_or_default();

        let max_chunk_tokens = match lookup(ENV_MAX_CHUNK_TOKENS) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                AppError::Config(format!(
                    "Invalid value for {}: '{}' is not a number",
                    ENV_MAX_CHUNK_TOKENS, raw
                ))
            })?,
            None => DEFAULT_MAX_CHUNK_TOKENS,
        };

        if max_chunk_tokens == 0 {
            return Err(AppError::Config(format!(
                "Invalid value for {}: budget must be positive",
                ENV_MAX_CHUNK_TOKENS
            )));
        }

        Ok(Self {
            api_key,
            model,
            endpoint,
            max_chunk_tokens,
        })
    }
}
