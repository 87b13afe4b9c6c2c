//! Per-session state: credential, result list, scratch directory.

use std::io;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;

use crate::evaluator::EvaluationRecord;

/// State held for the lifetime of one user session.
///
/// Mutated only through defined entry points: credential updates and batch
/// completion. The result list always reflects exactly one completed run;
/// a new run replaces it wholesale, so a reader never observes a mix of two
/// runs. The scratch directory is removed when the session is dropped.
pub struct EvalSession {
    credential: Option<SecretString>,
    results: Vec<EvaluationRecord>,
    work_dir: TempDir,
}

impl EvalSession {
    /// Creates a fresh session with an empty result list and a new scratch
    /// directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            credential: None,
            results: Vec::new(),
            work_dir: tempfile::tempdir()?,
        })
    }

    /// Stores the API credential. An empty string clears it, mirroring a
    /// user deleting the key from the settings field.
    pub fn set_credential(&mut self, credential: impl Into<String>) {
        let credential = credential.into();
        self.credential = if credential.is_empty() {
            None
        } else {
            Some(SecretString::new(credential))
        };
    }

    pub fn credential(&self) -> Option<&SecretString> {
        self.credential.as_ref()
    }

    /// Whether a non-empty credential is set; a batch must not start
    /// without one.
    pub fn has_credential(&self) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|c| !c.expose_secret().is_empty())
    }

    /// Results of the most recent completed run, in upload order.
    pub fn results(&self) -> &[EvaluationRecord] {
        &self.results
    }

    /// Replaces the stored results with those of a completed run.
    pub fn replace_results(&mut self, results: Vec<EvaluationRecord>) {
        self.results = results;
    }

    /// Looks up one result by its file identifier. Identifiers are unique
    /// within a run, so at most one record matches.
    pub fn result_for(&self, file: &str) -> Option<&EvaluationRecord> {
        self.results.iter().find(|r| r.file == file)
    }

    /// Ephemeral working directory for this session.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }
}
