use serde::Serialize;

use crate::score::Score;

/// One candidate file as uploaded: its display name and raw contents.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Display name, unique within one batch (derived from the file name).
    pub name: String,
    /// Raw byte contents, not yet decoded.
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// One (reference, candidate) text pair submitted for feedback.
///
/// Immutable, constructed per item. The model and temperature under which
/// the pair is evaluated are fixed in the provider configuration.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub reference_text: String,
    pub candidate_text: String,
}

impl EvaluationRequest {
    pub fn new(reference_text: impl Into<String>, candidate_text: impl Into<String>) -> Self {
        Self {
            reference_text: reference_text.into(),
            candidate_text: candidate_text.into(),
        }
    }
}

/// Outcome of evaluating one candidate file. Created once, never mutated.
///
/// Field renames carry the Czech column headers of the export format.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    #[serde(rename = "soubor")]
    pub file: String,
    #[serde(rename = "hodnocení (1–5)")]
    pub score: Score,
    #[serde(rename = "zpětná vazba")]
    pub feedback: String,
}

/// Progress observation emitted by the batch loop, one pair per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent<'a> {
    /// An item is about to be evaluated. `index` is 1-based.
    ItemStarted {
        index: usize,
        total: usize,
        file: &'a str,
    },
    /// An item finished (successfully or as a recorded failure).
    ItemFinished { index: usize, total: usize },
}
