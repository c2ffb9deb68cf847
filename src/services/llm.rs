use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// System role message sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful sales assistant agent.";

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("authentication rejected by the completion endpoint")]
    Auth,
    #[error("rate limit or quota exceeded")]
    RateLimited,
    #[error("completion endpoint returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response contained no completion text")]
    MalformedResponse,
}

impl LlmError {
    /// Message shown on the error page. Authentication and quota failures
    /// get their own wording; everything else falls back to a generic
    /// message carrying the underlying error text.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::MissingApiKey => {
                "OpenAI API key not found. Please set OPENAI_API_KEY in the environment."
                    .to_string()
            }
            LlmError::Auth => {
                "Invalid OpenAI API key. Please check your OPENAI_API_KEY value.".to_string()
            }
            LlmError::RateLimited => {
                "You have exceeded your OpenAI API quota or rate limit. \
                 Please check your usage and billing details."
                    .to_string()
            }
            LlmError::Api { .. } => format!("OpenAI API error: {self}"),
            other => format!("Unexpected error generating insights: {other}"),
        }
    }
}

pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    /// Configuration comes from the environment, read once at startup.
    /// A missing key is not an error here; it is surfaced to the user on
    /// the first generation attempt, before any network call.
    pub fn new() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let api_url =
            std::env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        LlmClient {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_body(&self, prompt: &str, max_tokens: u32) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": max_tokens,
            "temperature": 0.7
        })
    }

    /// Issue one chat-completion request and return the first choice's
    /// text, trimmed.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&self.request_body(prompt, max_tokens))
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            401 => return Err(LlmError::Auth),
            429 => return Err(LlmError::RateLimited),
            _ if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or(LlmError::MalformedResponse)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_client() -> LlmClient {
        LlmClient {
            client: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: Some("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    #[test]
    fn request_body_carries_fixed_sampling_parameters() {
        let body = bare_client().request_body("tell me things", 500);
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "tell me things");
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "  insight text  " } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.trim(), "insight text");
    }

    #[test]
    fn rate_limit_and_auth_get_specific_messages() {
        assert!(LlmError::RateLimited.user_message().contains("quota or rate limit"));
        assert!(LlmError::Auth.user_message().contains("Invalid OpenAI API key"));
        assert!(LlmError::MissingApiKey.user_message().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn other_errors_embed_the_underlying_text() {
        let err = LlmError::Api {
            status: 500,
            message: "server melted".to_string(),
        };
        let msg = err.user_message();
        assert!(msg.starts_with("OpenAI API error:"));
        assert!(msg.contains("server melted"));

        let msg = LlmError::MalformedResponse.user_message();
        assert!(msg.starts_with("Unexpected error generating insights:"));
    }
}
