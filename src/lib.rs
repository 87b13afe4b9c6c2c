//! EDUasistent: automated comparison and grading of student texts.
//!
//! A teacher supplies one reference text and a batch of student texts. Each
//! (reference, candidate) pair is sent to a chat-completion endpoint with a
//! fixed Czech instruction template; the free-form feedback is scanned for a
//! 1-5 rating. Results are collected per session and exportable as CSV or
//! XLSX.
//!
//! The crate is organized around a small set of seams:
//! - [`chat`]: chat message types and the [`chat::ChatProvider`] trait
//! - [`backends`]: the OpenAI-compatible chat transport
//! - [`builder`]: provider configuration and construction
//! - [`loader`]: byte-buffer decoding (UTF-8 with Windows-1250 fallback)
//! - [`score`]: heuristic rating extraction from feedback text
//! - [`evaluator`]: the sequential batch loop with progress reporting
//! - [`session`]: per-session state (credential, results, scratch dir)
//! - [`export`]: CSV/XLSX serialization of a result list

pub mod backends;
pub mod builder;
pub mod chat;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod loader;
pub mod prompt;
pub mod score;
pub mod secret_store;
pub mod session;

pub use builder::{ModelKind, ProviderBuilder};
pub use error::EvalError;
pub use evaluator::{
    BatchEvaluator, CandidateFile, EvaluationRecord, EvaluationRequest, FeedbackRequester,
    ProgressEvent,
};
pub use export::ExportFormat;
pub use score::Score;
pub use session::EvalSession;
