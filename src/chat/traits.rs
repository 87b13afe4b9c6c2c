use async_trait::async_trait;

use crate::error::EvalError;

use super::message::ChatMessage;

/// A provider's reply to a chat request.
pub trait ChatResponse: std::fmt::Debug + std::fmt::Display + Send + Sync {
    fn text(&self) -> Option<String>;
}

/// Trait for providers that support chat-style interactions.
#[async_trait]
pub trait ChatProvider: Sync + Send {
    /// Sends a single-turn chat request and returns the provider's response.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, EvalError>;
}
