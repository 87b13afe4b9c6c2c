//! OpenAI API client implementation for chat functionality.
//!
//! This module provides integration with OpenAI's GPT models through their
//! chat completions API. Each call is a single best-effort request with no
//! retry or backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole};
use crate::error::EvalError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for the OpenAI client.
#[derive(Debug)]
pub struct OpenAIConfig {
    /// API key for authentication with OpenAI.
    pub api_key: String,
    /// Base URL of the chat completions API.
    pub base_url: Url,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with OpenAI's API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAI {
    /// Shared configuration wrapped in Arc for cheap cloning.
    pub config: Arc<OpenAIConfig>,
    /// HTTP client for making requests.
    pub client: Client,
}

#[derive(Serialize)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
}

impl std::fmt::Display for OpenAIChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "No response content"),
        }
    }
}

#[derive(Deserialize, Debug)]
struct OpenAIChatChoice {
    message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatMsg {
    content: String,
}

impl ChatResponse for OpenAIChatResponse {
    fn text(&self) -> Option<String> {
        self.choices.first().and_then(|c| {
            if c.message.content.is_empty() {
                None
            } else {
                Some(c.message.content.trim().to_string())
            }
        })
    }
}

impl OpenAI {
    /// Creates a new OpenAI client with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `base_url` - Base URL override (defaults to the public API)
    /// * `model` - Model to use (defaults to "gpt-3.5-turbo")
    /// * `temperature` - Sampling temperature
    /// * `timeout_seconds` - Request timeout in seconds
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, EvalError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        let client = builder
            .build()
            .map_err(|e| EvalError::HttpError(e.to_string()))?;
        Self::with_client(client, api_key, base_url, model, temperature, timeout_seconds)
    }

    /// Creates a new OpenAI client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, EvalError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(EvalError::AuthError("Missing OpenAI API key".to_string()));
        }
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(Self {
            config: Arc::new(OpenAIConfig {
                api_key,
                base_url,
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature,
                timeout_seconds,
            }),
            client,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn temperature(&self) -> Option<f32> {
        self.config.temperature
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.config.timeout_seconds
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn chat_url(&self) -> Result<Url, EvalError> {
        self.config
            .base_url
            .join("chat/completions")
            .map_err(|e| EvalError::HttpError(e.to_string()))
    }

    async fn ensure_success_response(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, EvalError> {
        log::debug!("{context} HTTP status: {}", response.status());
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await?;
        Err(EvalError::ResponseFormatError {
            message: format!("{context} returned error status: {status}"),
            raw_response: error_text,
        })
    }
}

// The base URL must end with a slash so Url::join keeps the version segment.
fn normalize_base_url(raw: &str) -> Result<Url, EvalError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|e| EvalError::HttpError(e.to_string()))
}

#[async_trait]
impl ChatProvider for OpenAI {
    /// Sends a chat request to OpenAI's API.
    ///
    /// # Arguments
    ///
    /// * `messages` - The conversation history as a slice of chat messages
    ///
    /// # Returns
    ///
    /// The provider's response text or an error
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, EvalError> {
        if self.config.api_key.is_empty() {
            return Err(EvalError::AuthError("Missing OpenAI API key".to_string()));
        }

        let openai_msgs: Vec<OpenAIChatMessage> = messages
            .iter()
            .map(|m| OpenAIChatMessage {
                role: match m.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect();

        let body = OpenAIChatRequest {
            model: &self.config.model,
            messages: openai_msgs,
            temperature: self.config.temperature,
            stream: false,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("OpenAI request payload: {json}");
            }
        }

        let mut request = self
            .client
            .post(self.chat_url()?)
            .bearer_auth(&self.config.api_key)
            .json(&body);

        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        let resp = request.send().await?;
        let resp = self.ensure_success_response(resp, "OpenAI chat API").await?;

        let resp_text = resp.text().await?;
        let json_resp: OpenAIChatResponse =
            serde_json::from_str(&resp_text).map_err(|e| EvalError::ResponseFormatError {
                message: format!("Failed to decode OpenAI chat API response: {e}"),
                raw_response: resp_text,
            })?;

        Ok(Box::new(json_resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let result = OpenAI::new("", None, None, None, None);
        assert!(matches!(result, Err(EvalError::AuthError(_))));
    }

    #[test]
    fn base_url_join_keeps_version_segment() {
        let client = OpenAI::new("sk-test", None, None, None, None).unwrap();
        assert_eq!(
            client.chat_url().unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );

        let client =
            OpenAI::new("sk-test", Some("http://localhost:8080/v1".into()), None, None, None)
                .unwrap();
        assert_eq!(
            client.chat_url().unwrap().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn response_text_skips_empty_content() {
        let resp = OpenAIChatResponse {
            choices: vec![OpenAIChatChoice {
                message: OpenAIChatMsg {
                    content: String::new(),
                },
            }],
        };
        assert_eq!(resp.text(), None);
    }

    #[test]
    fn response_text_trims_whitespace() {
        let resp = OpenAIChatResponse {
            choices: vec![OpenAIChatChoice {
                message: OpenAIChatMsg {
                    content: "  Hodnocení: 4  \n".to_string(),
                },
            }],
        };
        assert_eq!(resp.text().as_deref(), Some("Hodnocení: 4"));
    }
}
