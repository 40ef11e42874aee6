// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::QuillError;

// =============================================================================
// PROVIDERS
// =============================================================================
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_DIFF_CHARS: usize = 60_000;

/// The closed set of model providers. Parsing is the only gate: anything
/// outside this set fails with `UnsupportedProvider` instead of falling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Google => "https://generativelanguage.googleapis.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Anthropic => "claude-sonnet-4-5-20250929",
            Provider::Google => "gemini-2.5-flash",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Google => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = QuillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "google" | "gemini" => Ok(Provider::Google),
            _ => Err(QuillError::UnsupportedProvider(s.trim().to_string())),
        }
    }
}

// =============================================================================
// CONFIG FILE
// =============================================================================
pub const CONFIG_FILENAME: &str = ".gitquill.toml";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_provider: Option<String>,
    pub default_format: Option<String>,
    pub default_language: Option<String>,
    pub max_diff_chars: Option<usize>,
    pub openai: Option<ProviderConfig>,
    pub anthropic: Option<ProviderConfig>,
    pub google: Option<ProviderConfig>,
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_FILENAME))
    }

    /// Lenient load: a missing or unparsable file behaves like an empty one.
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("Could not determine home directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        println!("Config saved to: {}", path.display());
        Ok(())
    }

    pub fn get_provider(&self, provider: Provider) -> Option<&ProviderConfig> {
        match provider {
            Provider::OpenAi => self.openai.as_ref(),
            Provider::Anthropic => self.anthropic.as_ref(),
            Provider::Google => self.google.as_ref(),
        }
    }

    pub fn get_provider_mut(&mut self, provider: Provider) -> &mut ProviderConfig {
        match provider {
            Provider::OpenAi => self.openai.get_or_insert_with(ProviderConfig::default),
            Provider::Anthropic => self.anthropic.get_or_insert_with(ProviderConfig::default),
            Provider::Google => self.google.get_or_insert_with(ProviderConfig::default),
        }
    }
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================
/// Merged view of CLI flags, the provider's config table, and environment
/// variables. The provider name is kept as written and model/base_url stay
/// optional here; the invoker validates the name and fills provider defaults,
/// so an unknown provider or missing key surfaces there, not during merging.
pub struct ResolvedConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_diff_chars: usize,
    pub format: Option<String>,
    pub language: Option<String>,
}

impl ResolvedConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cli_provider: Option<&String>,
        cli_api_key: Option<&String>,
        cli_model: Option<&String>,
        cli_base_url: Option<&String>,
        cli_max_tokens: Option<u32>,
        cli_temperature: Option<f32>,
        cli_max_diff_chars: Option<usize>,
        cli_format: Option<&String>,
        cli_language: Option<&String>,
        file: &Config,
    ) -> Self {
        // Provider name: CLI > config default > "openai". Canonicalize known
        // names (and their aliases); keep unknown ones verbatim for the error.
        let raw = cli_provider
            .cloned()
            .or_else(|| file.default_provider.clone())
            .unwrap_or_else(|| Provider::OpenAi.as_str().to_string());

        let parsed = Provider::from_str(&raw).ok();
        let provider = parsed
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| raw.trim().to_string());

        let provider_config = parsed.and_then(|p| file.get_provider(p));

        // API key: CLI > provider table > env var
        let env_api_key = parsed.and_then(|p| std::env::var(p.env_var()).ok());
        let api_key = cli_api_key
            .cloned()
            .or_else(|| provider_config.and_then(|p| p.api_key.clone()))
            .or(env_api_key);

        // Model and base URL: CLI > provider table; provider default later
        let model = cli_model
            .cloned()
            .or_else(|| provider_config.and_then(|p| p.model.clone()));
        let base_url = cli_base_url
            .cloned()
            .or_else(|| provider_config.and_then(|p| p.base_url.clone()));

        let max_tokens = cli_max_tokens
            .or_else(|| provider_config.and_then(|p| p.max_tokens))
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let temperature = cli_temperature
            .or_else(|| provider_config.and_then(|p| p.temperature))
            .unwrap_or(DEFAULT_TEMPERATURE);

        let max_diff_chars = cli_max_diff_chars
            .or(file.max_diff_chars)
            .unwrap_or(DEFAULT_MAX_DIFF_CHARS);

        // Request defaults: CLI > config file; prompts fall back to built-ins
        let format = cli_format.cloned().or_else(|| file.default_format.clone());
        let language = cli_language
            .cloned()
            .or_else(|| file.default_language.clone());

        Self {
            provider,
            api_key,
            model,
            base_url,
            max_tokens,
            temperature,
            max_diff_chars,
            format,
            language,
        }
    }
}
