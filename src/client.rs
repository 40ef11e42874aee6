// src/client.rs
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::debug;

use crate::config::{Provider, ResolvedConfig};
use crate::error::QuillError;
use crate::flow::ModelInvoker;
use crate::providers;

pub struct LlmClient {
    http: Client,
    provider: String,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl LlmClient {
    /// Builds the HTTP client. Provider and key checks wait until
    /// [`ModelInvoker::invoke`] so earlier pipeline failures win.
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(std::time::Duration::from_secs(120));

        if let Ok(proxy_url) = std::env::var("GITQUILL_PROXY") {
            let proxy_url = proxy_url.trim();
            if !proxy_url.is_empty() {
                builder = builder.proxy(Proxy::all(proxy_url)?);
            }
        }

        let http = builder.build()?;

        Ok(Self {
            http,
            provider: config.provider.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ModelInvoker for LlmClient {
    /// Validates the provider name and key before any traffic goes out;
    /// on success exactly one request is sent, with no retry.
    async fn invoke(&self, system: &str, prompt: &str) -> Result<String, QuillError> {
        let provider = Provider::from_str(&self.provider)?;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(QuillError::ModelNotConfigured { provider })?;

        let model = self.model.as_deref().unwrap_or(provider.default_model());
        let base_url = self.base_url.as_deref().unwrap_or(provider.base_url());
        debug!(provider = provider.as_str(), model, "invoking model");

        let result = match provider {
            Provider::OpenAi => {
                providers::openai::chat(
                    &self.http,
                    base_url,
                    api_key,
                    model,
                    self.max_tokens,
                    self.temperature,
                    system,
                    prompt,
                )
                .await
            }
            Provider::Anthropic => {
                providers::anthropic::chat(
                    &self.http,
                    base_url,
                    api_key,
                    model,
                    self.max_tokens,
                    self.temperature,
                    system,
                    prompt,
                )
                .await
            }
            Provider::Google => {
                providers::google::chat(
                    &self.http,
                    base_url,
                    api_key,
                    model,
                    self.max_tokens,
                    self.temperature,
                    system,
                    prompt,
                )
                .await
            }
        };

        // {:#} keeps the cause chain on one line, so a transport failure
        // reads "Failed to send request: connection refused".
        result.map_err(|e| QuillError::Generation(format!("{:#}", e)))
    }
}
