// src/providers/google.rs
use anyhow::{bail, Context, Result};
use reqwest::Client;

use crate::types::*;

fn normalize_base_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1beta") {
        base.to_string()
    } else {
        format!("{}/v1beta", base)
    }
}

fn normalize_model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn truncate_body(body: &str) -> &str {
    // Back off to a char boundary so a multibyte body cannot split.
    let mut cut = body.len().min(500);
    while cut > 0 && !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

/// Sends one generateContent request and returns the reply text.
#[allow(clippy::too_many_arguments)]
pub async fn chat(
    http: &Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    max_tokens: u32,
    temperature: f32,
    system: &str,
    user: &str,
) -> Result<String> {
    let base = normalize_base_url(base_url);
    let model_path = normalize_model_path(model);
    let url = format!("{}/{}:generateContent", base, model_path);

    let request = GeminiRequest {
        system_instruction: if system.trim().is_empty() {
            None
        } else {
            Some(GeminiContent {
                parts: vec![GeminiPart {
                    text: system.to_string(),
                }],
            })
        },
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: user.to_string(),
            }],
        }],
        generation_config: Some(GeminiGenerationConfig {
            max_output_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }),
    };

    let response = http
        .post(&url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("X-goog-api-key", api_key)
        .json(&request)
        .send()
        .await
        .context("Failed to send request")?;

    let status = response.status();
    let body = response.text().await.context("Failed to read response body")?;

    if !status.is_success() {
        if let Ok(err) = serde_json::from_str::<ApiError>(&body) {
            if let Some(detail) = err.error {
                if let Some(msg) = detail.message {
                    bail!("API error ({}): {}", status, msg);
                }
            }
        }
        bail!("API error ({}): {}", status, truncate_body(&body));
    }

    let resp: GeminiResponse =
        serde_json::from_str(&body).context("Failed to parse response")?;

    resp.candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.trim().to_string())
        .context("No response content from Gemini API")
}
