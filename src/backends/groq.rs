//! Groq API client implementation for chat completion functionality.
//!
//! This module provides integration with Groq's models through their
//! OpenAI-compatible API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::ChatRole;
use crate::completion::{CompletionProvider, CompletionRequest, CompletionResponse};
use crate::error::SweepError;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Configuration for the Groq client.
#[derive(Debug)]
pub struct GroqConfig {
    /// API key for authentication with Groq.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with Groq's API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Groq {
    /// Shared configuration wrapped in Arc for cheap cloning.
    pub config: Arc<GroqConfig>,
    /// HTTP client for making requests.
    pub client: Client,
}

#[derive(Serialize)]
struct GroqChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct GroqChatRequest<'a> {
    model: &'a str,
    messages: Vec<GroqChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct GroqChatResponse {
    choices: Vec<GroqChatChoice>,
}

#[derive(Deserialize, Debug)]
struct GroqChatChoice {
    message: GroqChatMsg,
}

#[derive(Deserialize, Debug)]
struct GroqChatMsg {
    content: String,
}

impl Groq {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, None, None)
    }

    /// Creates a new Groq client with an optional base URL override and timeout.
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }
        Self::with_client(
            builder.build().expect("Failed to build reqwest Client"),
            api_key,
            base_url,
            timeout_seconds,
        )
    }

    /// Creates a new Groq client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        Self {
            config: Arc::new(GroqConfig {
                api_key: api_key.into(),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_seconds,
            }),
            client,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.config.timeout_seconds
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionProvider for Groq {
    /// Sends a completion request to Groq's chat completions API.
    ///
    /// # Arguments
    ///
    /// * `req` - The completion request with model, messages and sampling parameters
    ///
    /// # Returns
    ///
    /// The generated text or an error
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse, SweepError> {
        if self.config.api_key.is_empty() {
            return Err(SweepError::AuthError("Missing Groq API key".to_string()));
        }

        let groq_msgs: Vec<GroqChatMessage> = req
            .messages
            .iter()
            .map(|m| GroqChatMessage {
                role: match m.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect();

        let body = GroqChatRequest {
            model: &req.model,
            messages: groq_msgs,
            temperature: req.temperature,
            max_tokens: req.max_output_tokens,
            top_p: req.top_p,
            stream: false,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Groq request payload: {}", json);
            }
        }

        let mut request = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body);

        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        let resp = request.send().await?;

        log::debug!("Groq HTTP status: {}", resp.status());

        let resp = resp.error_for_status()?;

        let json_resp: GroqChatResponse = resp.json().await?;

        let text = json_resp
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SweepError::ResponseFormatError {
                message: "No completion choice in Groq response".to_string(),
                raw_response: format!("{json_resp:?}"),
            })?;

        Ok(CompletionResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;

    fn request(model: &str, prompt: &str) -> CompletionRequest {
        CompletionRequest::new(model, vec![ChatMessage::user().content(prompt).build()])
            .temperature(0.7)
            .max_output_tokens(512)
            .top_p(1.0)
    }

    #[tokio::test]
    async fn complete_parses_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  hello there  "}}]}"#,
            )
            .create_async()
            .await;

        let groq = Groq::with_config("test-key", Some(server.url()), None);
        let resp = groq
            .complete(&request("llama3-70b-8192", "say hello"))
            .await
            .unwrap();

        assert_eq!(resp.text, "hello there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn complete_sends_sampling_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "llama3-70b-8192",
                "temperature": 0.7,
                "max_tokens": 512,
                "top_p": 1.0,
                "stream": false,
                "messages": [{"role": "user", "content": "say hello"}],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
            .create_async()
            .await;

        let groq = Groq::with_config("test-key", Some(server.url()), None);
        groq.complete(&request("llama3-70b-8192", "say hello"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_surfaces_as_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let groq = Groq::with_config("test-key", Some(server.url()), None);
        let err = groq
            .complete(&request("llama3-70b-8192", "say hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, SweepError::HttpError(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_a_format_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let groq = Groq::with_config("test-key", Some(server.url()), None);
        let err = groq
            .complete(&request("llama3-70b-8192", "say hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, SweepError::ResponseFormatError { .. }));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_sending() {
        let groq = Groq::new("");
        let err = groq
            .complete(&request("llama3-70b-8192", "say hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, SweepError::AuthError(_)));
    }
}
