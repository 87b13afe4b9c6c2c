use thiserror::Error;

/// Error types that can occur while evaluating texts.
#[derive(Debug, Error)]
pub enum EvalError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by the LLM provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// Neither supported text encoding applies to the input
    #[error("Decode error: {0}")]
    DecodeError(String),
    /// Result serialization errors
    #[error("Export error: {0}")]
    ExportError(String),
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// Generic error
    #[error("Generic error: {0}")]
    Generic(String),
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        EvalError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<csv::Error> for EvalError {
    fn from(err: csv::Error) -> Self {
        EvalError::ExportError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for EvalError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        EvalError::ExportError(err.to_string())
    }
}
