use crate::chat::{ChatMessage, ChatProvider};
use crate::error::EvalError;
use crate::prompt::build_feedback_prompt;

use super::types::EvaluationRequest;

/// Sends one (reference, candidate) pair to the chat provider and returns
/// the feedback text.
///
/// A single best-effort call per request: no retry, no backoff. Failures
/// come back as typed errors for the batch loop to record.
pub struct FeedbackRequester {
    provider: Box<dyn ChatProvider>,
}

impl FeedbackRequester {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Requests comparative feedback for one evaluation pair.
    pub async fn request(&self, request: &EvaluationRequest) -> Result<String, EvalError> {
        let prompt = build_feedback_prompt(&request.reference_text, &request.candidate_text);
        let messages = [ChatMessage::user().content(prompt).build()];
        let response = self.provider.chat(&messages).await?;
        response
            .text()
            .ok_or_else(|| EvalError::ProviderError("no text in chat response".to_string()))
    }
}
