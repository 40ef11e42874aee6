// src/providers/anthropic.rs
use anyhow::{bail, Context, Result};
use reqwest::Client;

use crate::types::*;

const ANTHROPIC_VERSION: &str = "2023-06-01";

fn truncate_body(body: &str) -> &str {
    // Back off to a char boundary so a multibyte body cannot split.
    let mut cut = body.len().min(500);
    while cut > 0 && !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

/// Sends one Messages API request and returns the reply text.
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
    let url = format!("{}/messages", base_url.trim_end_matches('/'));

    let request = MessagesRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: user.to_string(),
        }],
        system: system.to_string(),
        max_tokens,
        temperature: Some(temperature),
    };

    let response = http
        .post(&url)
        .header("Content-Type", "application/json")
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("x-api-key", api_key)
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

    let resp: MessagesResponse =
        serde_json::from_str(&body).context("Failed to parse response")?;

    resp.content
        .first()
        .and_then(|c| c.text.as_ref())
        .map(|s| s.trim().to_string())
        .context("No response content from Anthropic API")
}

// =============================================================================
// MODULE TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn assert_f64_approx(actual: f64, expected: f64, eps: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= eps,
            "expected ~{}, got {} (diff {}, eps {})",
            expected,
            actual,
            diff,
            eps
        );
    }

    #[test]
    fn request_builds_correctly() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-5-20250929".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "diff".to_string(),
            }],
            system: "rules".to_string(),
            max_tokens: 1024,
            temperature: Some(0.7),
        };

        let v: Value = serde_json::to_value(&request).unwrap();

        assert_eq!(v["model"], "claude-sonnet-4-5-20250929");
        assert_eq!(v["system"], "rules");
        assert_eq!(v["max_tokens"], 1024);

        let temp = v["temperature"].as_f64().expect("temperature should be a number");
        assert_f64_approx(temp, 0.7, 1e-6);

        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"], "diff");
    }

    #[test]
    fn system_rides_outside_the_message_list() {
        // The Messages API takes the system prompt as a top-level field,
        // not as a "system" role message.
        let request = MessagesRequest {
            model: "claude-sonnet-4-5-20250929".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "diff".to_string(),
            }],
            system: "rules".to_string(),
            max_tokens: 500,
            temperature: None,
        };
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn reply_text_is_trimmed_from_first_block() {
        let body = r#"{"content": [{"type": "text", "text": " 1. fix: close socket \n"}]}"#;
        let resp: MessagesResponse = serde_json::from_str(body).unwrap();
        let text = resp
            .content
            .first()
            .and_then(|c| c.text.as_ref())
            .map(|s| s.trim().to_string());
        assert_eq!(text, Some("1. fix: close socket".to_string()));
    }

    #[test]
    fn error_body_cap_backs_off_to_a_char_boundary() {
        let body = format!("{}注注", "x".repeat(499));
        let cut = truncate_body(&body);
        assert_eq!(cut.len(), 499);
        assert!(cut.ends_with('x'));
    }
}
