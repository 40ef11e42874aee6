// src/providers/openai.rs
use anyhow::{bail, Context, Result};
use reqwest::Client;

use crate::types::*;

fn truncate_body(body: &str) -> &str {
    // Back off to a char boundary so a multibyte body cannot split.
    let mut cut = body.len().min(500);
    while cut > 0 && !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

/// Sends one chat completion request and returns the reply text.
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
    let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));

    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ],
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
    };

    let response = http
        .post(&url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("Authorization", format!("Bearer {}", api_key))
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

    let resp: ChatCompletionResponse =
        serde_json::from_str(&body).context("Failed to parse response")?;

    resp.choices
        .first()
        .and_then(|c| c.message.content.as_ref())
        .map(|s| s.trim().to_string())
        .context("No response content from OpenAI API")
}

// =============================================================================
// MODULE TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_system_then_user() {
        let request = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "rules".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "diff".to_string(),
                },
            ],
            max_tokens: Some(1024),
            temperature: Some(0.7),
        };
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
    }

    #[test]
    fn request_serializes_token_and_temperature_caps() {
        let request = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![],
            max_tokens: Some(500),
            temperature: Some(0.5),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"max_tokens\":500"));
        assert!(json.contains("\"temperature\":0.5"));
    }

    #[test]
    fn reply_text_is_trimmed_from_first_choice() {
        let body = r#"{"choices": [{"message": {"content": "  1. feat: add parser\n"}}]}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let text = resp
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|s| s.trim().to_string());
        assert_eq!(text, Some("1. feat: add parser".to_string()));
    }

    #[test]
    fn empty_choices_yield_no_text() {
        let body = r#"{"choices": []}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(resp
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .is_none());
    }

    #[test]
    fn oversized_error_body_is_cut_on_a_char_boundary() {
        // 3-byte chars; a flat 500-byte cap would land mid-char.
        let body = "注".repeat(200);
        let cut = truncate_body(&body);
        assert_eq!(cut.len(), 498);
        assert!(cut.chars().all(|c| c == '注'));
    }

    #[test]
    fn short_error_body_is_kept_whole() {
        assert_eq!(truncate_body("invalid_api_key"), "invalid_api_key");
    }
}
