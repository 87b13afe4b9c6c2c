//! Heuristic extraction of a 1-5 rating from free-form feedback text.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::EvalError;

/// Display marker for a feedback without a parsable rating.
pub const UNKNOWN_MARKER: &str = "?";
/// Display marker for an item that failed to load or evaluate.
pub const ERROR_MARKER: &str = "X";

/// The rating attached to one evaluated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// A 1-5 rating extracted from the feedback
    Rated(u8),
    /// Feedback arrived but no rating was found in it
    Unknown,
    /// The item failed to load or evaluate
    Error,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Rated(n) => write!(f, "{n}"),
            Score::Unknown => f.write_str(UNKNOWN_MARKER),
            Score::Error => f.write_str(ERROR_MARKER),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl FromStr for Score {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UNKNOWN_MARKER => Ok(Score::Unknown),
            ERROR_MARKER => Ok(Score::Error),
            digit => match digit.parse::<u8>() {
                Ok(n @ 1..=5) => Ok(Score::Rated(n)),
                _ => Err(EvalError::Generic(format!("Unknown score marker: {s}"))),
            },
        }
    }
}

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Case-insensitive "hodnocení" followed (on the same line) by the first
    // digit 1-5. The feedback is unstructured model output, so this stays a
    // best-effort heuristic: an ambiguous response with several rating
    // mentions yields whichever digit appears first.
    PATTERN.get_or_init(|| Regex::new(r"(?i)hodnocení.*?([1-5])").expect("score pattern compiles"))
}

/// Scans feedback text for a rating mention and extracts the 1-5 value,
/// falling back to [`Score::Unknown`] when no match is found.
pub fn extract_score(feedback: &str) -> Score {
    score_pattern()
        .captures(feedback)
        .and_then(|caps| caps.get(1))
        .and_then(|digit| digit.as_str().parse::<u8>().ok())
        .map(Score::Rated)
        .unwrap_or(Score::Unknown)
}
