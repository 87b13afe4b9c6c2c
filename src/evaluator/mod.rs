//! The sequential batch loop: decode, request, score, record.

mod requester;
mod types;

pub use requester::FeedbackRequester;
pub use types::{CandidateFile, EvaluationRecord, EvaluationRequest, ProgressEvent};

use crate::chat::ChatProvider;
use crate::loader::decode_text;
use crate::score::{extract_score, Score};

type ProgressFn = Box<dyn Fn(ProgressEvent<'_>) + Send + Sync>;

/// Evaluates a batch of candidate files against one reference text.
///
/// Items are processed strictly in upload order, one at a time. A failing
/// item is recorded as an error row and never stops the batch; the requester
/// is not invoked for items whose bytes cannot be decoded.
pub struct BatchEvaluator {
    requester: FeedbackRequester,
    progress: Option<ProgressFn>,
}

impl BatchEvaluator {
    /// Creates a new batch evaluator over the given chat provider.
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            requester: FeedbackRequester::new(provider),
            progress: None,
        }
    }

    /// Registers a callback observing per-item progress.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(ProgressEvent<'_>) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(f));
        self
    }

    /// Runs the whole batch and returns one record per candidate, in input
    /// order. Always processes every item exactly once; there is no
    /// early-abort path.
    pub async fn run(
        &self,
        reference: &str,
        candidates: &[CandidateFile],
    ) -> Vec<EvaluationRecord> {
        let total = candidates.len();
        let mut records = Vec::with_capacity(total);

        for (i, file) in candidates.iter().enumerate() {
            let index = i + 1;
            self.emit(ProgressEvent::ItemStarted {
                index,
                total,
                file: &file.name,
            });

            let record = match decode_text(&file.bytes) {
                Ok(decoded) => self.evaluate_one(reference, &file.name, &decoded.text).await,
                Err(err) => {
                    log::warn!("Failed to decode {}: {err}", file.name);
                    EvaluationRecord {
                        file: file.name.clone(),
                        score: Score::Error,
                        feedback: format!("Chyba při zpracování: {err}"),
                    }
                }
            };
            records.push(record);

            self.emit(ProgressEvent::ItemFinished { index, total });
        }

        records
    }

    async fn evaluate_one(
        &self,
        reference: &str,
        file_name: &str,
        candidate: &str,
    ) -> EvaluationRecord {
        let request = EvaluationRequest::new(reference, candidate);
        match self.requester.request(&request).await {
            Ok(feedback) => EvaluationRecord {
                file: file_name.to_string(),
                score: extract_score(&feedback),
                feedback,
            },
            Err(err) => {
                log::warn!("Feedback request for {file_name} failed: {err}");
                EvaluationRecord {
                    file: file_name.to_string(),
                    score: Score::Error,
                    feedback: format!("Chyba: {err}"),
                }
            }
        }
    }

    fn emit(&self, event: ProgressEvent<'_>) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::chat::{ChatMessage, ChatResponse};
    use crate::error::EvalError;

    use super::*;

    #[derive(Debug)]
    struct StubResponse(String);

    impl std::fmt::Display for StubResponse {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl ChatResponse for StubResponse {
        fn text(&self) -> Option<String> {
            Some(self.0.clone())
        }
    }

    /// Deterministic provider: answers from a fixed list, cycling per call,
    /// and counts how often it was invoked. `Err` entries simulate transport
    /// failures.
    struct StubProvider {
        replies: Vec<Result<String, String>>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(replies: Vec<Result<String, String>>) -> Self {
            Self {
                replies,
                calls: AtomicUsize::new(0),
            }
        }

        fn single(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_string())])
        }
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
        ) -> Result<Box<dyn ChatResponse>, EvalError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.replies[call % self.replies.len()] {
                Ok(text) => Ok(Box::new(StubResponse(text.clone()))),
                Err(msg) => Err(EvalError::HttpError(msg.clone())),
            }
        }
    }

    fn candidate(name: &str, text: &str) -> CandidateFile {
        CandidateFile::new(name, text.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn single_candidate_end_to_end() {
        let evaluator = BatchEvaluator::new(Box::new(StubProvider::single(
            "Hodnocení: 5. Dobrá práce.",
        )));
        let records = evaluator
            .run(
                "Kočka je zvíře.",
                &[candidate("zak1.txt", "Kočky jsou zvířata.")],
            )
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file, "zak1.txt");
        assert_eq!(records[0].score, Score::Rated(5));
        assert_eq!(records[0].feedback, "Hodnocení: 5. Dobrá práce.");
    }

    #[tokio::test]
    async fn results_preserve_upload_order() {
        let evaluator =
            BatchEvaluator::new(Box::new(StubProvider::single("Hodnocení: 3")));
        let records = evaluator
            .run(
                "vzor",
                &[
                    candidate("A.txt", "a"),
                    candidate("B.txt", "b"),
                    candidate("C.txt", "c"),
                ],
            )
            .await;

        let names: Vec<&str> = records.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(names, ["A.txt", "B.txt", "C.txt"]);
    }

    #[tokio::test]
    async fn failed_request_does_not_abort_batch() {
        let evaluator = BatchEvaluator::new(Box::new(StubProvider::new(vec![
            Ok("Hodnocení: 4".to_string()),
            Err("connection reset".to_string()),
            Ok("Hodnocení: 2".to_string()),
        ])));
        let records = evaluator
            .run(
                "vzor",
                &[
                    candidate("A.txt", "a"),
                    candidate("B.txt", "b"),
                    candidate("C.txt", "c"),
                ],
            )
            .await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].score, Score::Rated(4));
        assert_eq!(records[1].score, Score::Error);
        assert!(records[1].feedback.starts_with("Chyba: "));
        assert!(records[1].feedback.contains("connection reset"));
        assert_eq!(records[2].score, Score::Rated(2));
    }

    #[tokio::test]
    async fn undecodable_candidate_skips_requester() {
        let provider = Arc::new(StubProvider::single("Hodnocení: 5"));

        struct Shared(Arc<StubProvider>);

        #[async_trait]
        impl ChatProvider for Shared {
            async fn chat(
                &self,
                messages: &[ChatMessage],
            ) -> Result<Box<dyn ChatResponse>, EvalError> {
                self.0.chat(messages).await
            }
        }

        let evaluator = BatchEvaluator::new(Box::new(Shared(provider.clone())));
        let records = evaluator
            .run(
                "vzor",
                &[
                    CandidateFile::new("bad.txt", b"\xFF\xFE\x81".to_vec()),
                    candidate("good.txt", "text"),
                ],
            )
            .await;

        assert_eq!(records[0].score, Score::Error);
        assert!(records[0].feedback.starts_with("Chyba při zpracování: "));
        assert_eq!(records[1].score, Score::Rated(5));
        // Only the decodable item reached the provider.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn feedback_without_rating_is_unknown_not_error() {
        let evaluator =
            BatchEvaluator::new(Box::new(StubProvider::single("Pěkný text, jen tak dál.")));
        let records = evaluator.run("vzor", &[candidate("A.txt", "a")]).await;
        assert_eq!(records[0].score, Score::Unknown);
        assert_eq!(records[0].feedback, "Pěkný text, jen tak dál.");
    }

    #[tokio::test]
    async fn progress_events_cover_every_item_in_order() {
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let evaluator = BatchEvaluator::new(Box::new(StubProvider::single("Hodnocení: 1")))
            .on_progress(move |event| {
                let line = match event {
                    ProgressEvent::ItemStarted { index, total, file } => {
                        format!("start {index}/{total} {file}")
                    }
                    ProgressEvent::ItemFinished { index, total } => {
                        format!("done {index}/{total}")
                    }
                };
                sink.lock().unwrap().push(line);
            });

        evaluator
            .run("vzor", &[candidate("A.txt", "a"), candidate("B.txt", "b")])
            .await;

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            [
                "start 1/2 A.txt",
                "done 1/2",
                "start 2/2 B.txt",
                "done 2/2",
            ]
        );
    }

    #[tokio::test]
    async fn rerun_with_identical_inputs_is_deterministic() {
        let candidates = [candidate("A.txt", "a"), candidate("B.txt", "b")];

        let mut runs = Vec::new();
        for _ in 0..2 {
            let evaluator =
                BatchEvaluator::new(Box::new(StubProvider::single("Hodnocení: 4")));
            runs.push(evaluator.run("vzor", &candidates).await);
        }

        let pairs = |records: &[EvaluationRecord]| {
            records
                .iter()
                .map(|r| (r.file.clone(), r.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&runs[0]), pairs(&runs[1]));
    }
}
