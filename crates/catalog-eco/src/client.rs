//! Chat-completions client for a vision-capable language model.

use std::time::Duration;

use catalog_core::VisionConfig;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::EcoError;

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Sends exactly one request per call; there is no retry.
pub struct VisionClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl VisionClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`EcoError::InvalidBaseUrl`] if the configured base URL does not parse.
    pub fn new(config: &VisionConfig) -> Result<Self, EcoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catalog-enrich/0.1 (eco-score)")
            .build()?;

        let endpoint = chat_completions_url(&config.base_url)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Asks the model about one image and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// - [`EcoError::Http`] on network failure or timeout.
    /// - [`EcoError::Api`] on a non-2xx response, with the API's error message.
    /// - [`EcoError::Deserialize`] if the response is not a chat completion.
    /// - [`EcoError::EmptyResponse`] if there is no choice or it has no content.
    pub async fn ask(&self, prompt: &str, image_url: &str) -> Result<String, EcoError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image_url },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(EcoError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| EcoError::Deserialize {
                context: "chat completion".to_owned(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(EcoError::EmptyResponse)
    }
}

/// Resolves the chat-completions URL from a base URL that may or may not
/// already include `/v1` or the full path.
fn chat_completions_url(base_url: &str) -> Result<Url, EcoError> {
    let base = base_url.trim_end_matches('/');
    let full = if base.ends_with("/chat/completions") {
        base.to_owned()
    } else if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    };
    Url::parse(&full).map_err(|e| EcoError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Pulls `error.message` out of an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_from_bare_host() {
        let url = chat_completions_url("https://api.openai.com").unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn endpoint_from_v1_base() {
        let url = chat_completions_url("http://localhost:1234/v1/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn endpoint_already_complete() {
        let url = chat_completions_url("https://gateway.example.com/v1/chat/completions").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gateway.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(matches!(
            chat_completions_url("::nope::"),
            Err(EcoError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn api_error_message_prefers_structured_message() {
        let body = r#"{"error":{"message":"Invalid image URL","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Invalid image URL");
    }

    #[test]
    fn api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    fn request(temperature: Option<f32>) -> ChatRequest<'static> {
        ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: "describe" },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "https://cdn.example.com/a.jpg",
                        },
                    },
                ],
            }],
            max_tokens: 200,
            temperature,
        }
    }

    #[test]
    fn request_body_has_text_and_image_parts() {
        assert_eq!(
            serde_json::to_value(request(None)).unwrap(),
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "describe" },
                        { "type": "image_url", "image_url": { "url": "https://cdn.example.com/a.jpg" } }
                    ]
                }],
                "max_tokens": 200
            })
        );
    }

    #[test]
    fn request_body_carries_temperature_only_when_set() {
        let unset = serde_json::to_value(request(None)).unwrap();
        assert!(unset.get("temperature").is_none());

        let set = serde_json::to_value(request(Some(0.0))).unwrap();
        assert_eq!(set["temperature"], serde_json::json!(0.0));
    }
}
