//! Provider configuration and construction.

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::backends::openai::OpenAI;
use crate::error::EvalError;

/// Default sampling temperature for feedback requests.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Model tiers available for text analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Fast, inexpensive tier
    #[default]
    Gpt35Turbo,
    /// Higher-quality tier
    Gpt4,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Gpt35Turbo => "gpt-3.5-turbo",
            ModelKind::Gpt4 => "gpt-4",
        }
    }

    /// All selectable model tiers.
    pub fn all() -> &'static [ModelKind] {
        &[ModelKind::Gpt35Turbo, ModelKind::Gpt4]
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpt-3.5-turbo" => Ok(ModelKind::Gpt35Turbo),
            "gpt-4" => Ok(ModelKind::Gpt4),
            other => Err(EvalError::InvalidRequest(format!(
                "Unknown model: {other}"
            ))),
        }
    }
}

/// Builder for configuring and instantiating the chat provider.
pub struct ProviderBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    model: ModelKind,
    temperature: f32,
    timeout_seconds: Option<u64>,
}

impl Default for ProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: ModelKind::default(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_seconds: None,
        }
    }
}

impl ProviderBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model tier to use.
    pub fn model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Sets the temperature for controlling response randomness (0.0-1.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Builds the configured provider.
    ///
    /// Fails when no API key was supplied or the temperature is outside
    /// the 0.0-1.0 range.
    pub fn build(self) -> Result<OpenAI, EvalError> {
        let api_key = self
            .api_key
            .ok_or_else(|| EvalError::AuthError("No API key provided".to_string()))?;
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(EvalError::InvalidRequest(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        OpenAI::new(
            api_key.expose_secret(),
            self.base_url,
            Some(self.model.as_str().to_string()),
            Some(self.temperature),
            self.timeout_seconds,
        )
    }
}
