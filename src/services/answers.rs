use crate::models::{AnswerSet, QuizId};

use super::{
    fetcher::{FetchError, HttpQuizSource, QuizSource},
    normalizer,
};

// ---------------------------------------------------------------------------
// AnswerService
// ---------------------------------------------------------------------------

pub struct AnswerService<S: QuizSource = HttpQuizSource> {
    source: S,
}

impl<S: QuizSource + Clone> Clone for AnswerService<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<S: QuizSource> AnswerService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch quiz `id` and extract its answers in question order.
    ///
    /// Questions that cannot be normalized are logged and left out; only a
    /// failed fetch is an error.
    #[tracing::instrument(skip_all, fields(quiz_id = %id))]
    pub async fn extract_answers(&self, id: &QuizId) -> Result<AnswerSet, FetchError> {
        let payload = self.source.fetch(id).await?;

        let mut pairs = Vec::with_capacity(payload.questions.len());
        let mut skipped = 0;
        for (position, raw) in payload.questions.iter().enumerate() {
            match normalizer::normalize_raw(raw) {
                Ok(pair) => pairs.push(pair),
                Err(skip) => {
                    tracing::warn!("skipping question {position}: {skip}");
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            "extracted {} answers from {} questions",
            pairs.len(),
            payload.questions.len()
        );

        Ok(AnswerSet {
            quiz_id: id.clone(),
            pairs,
            skipped,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        models::AnswerPair,
        services::fetcher::{MockQuizSource, RawQuizPayload},
    };

    fn question(query: &str, options: &[&str], answer: usize) -> Value {
        let options: Vec<Value> = options.iter().map(|o| json!({ "text": o })).collect();
        json!({
            "type": "MCQ",
            "structure": {
                "query": { "text": query },
                "options": options,
                "answer": answer
            }
        })
    }

    fn pair(question: &str, answer: &str) -> AnswerPair {
        AnswerPair {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn service_with(questions: Vec<Value>) -> AnswerService<MockQuizSource> {
        let mut mock = MockQuizSource::new();
        mock.expect_fetch().times(1).returning(move |_| {
            let payload = RawQuizPayload {
                questions: questions.clone(),
            };
            Box::pin(async move { Ok(payload) })
        });
        AnswerService::new(mock)
    }

    fn quiz_id(id: &str) -> QuizId {
        QuizId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn end_to_end_single_question() {
        let svc = service_with(vec![question("<p>2+2=?</p>", &["3", "<b>4</b>", "5"], 1)]);

        let answers = svc.extract_answers(&quiz_id("abc123")).await.unwrap();

        assert_eq!(answers.quiz_id.as_str(), "abc123");
        assert_eq!(answers.pairs, vec![pair("2+2=?", "4")]);
        assert_eq!(answers.skipped, 0);
    }

    #[tokio::test]
    async fn preserves_question_order() {
        let svc = service_with(vec![
            question("q0", &["a0", "b0"], 0),
            question("q1", &["a1", "b1"], 1),
            question("q2", &["a2", "b2"], 0),
        ]);

        let answers = svc.extract_answers(&quiz_id("order")).await.unwrap();

        assert_eq!(
            answers.pairs,
            vec![pair("q0", "a0"), pair("q1", "b1"), pair("q2", "a2")]
        );
    }

    #[tokio::test]
    async fn out_of_range_question_is_dropped_without_affecting_siblings() {
        let svc = service_with(vec![
            question("q0", &["a0", "b0"], 0),
            question("q1", &["a1", "b1"], 99),
            question("q2", &["a2", "b2"], 1),
        ]);

        let answers = svc.extract_answers(&quiz_id("skips")).await.unwrap();

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.pairs, vec![pair("q0", "a0"), pair("q2", "b2")]);
        assert_eq!(answers.skipped, 1);
    }

    #[tokio::test]
    async fn unsupported_question_types_are_dropped() {
        let svc = service_with(vec![
            json!({ "type": "MSQ", "structure": { "query": { "text": "pick two" }, "options": [{ "text": "a" }, { "text": "b" }], "answer": [0, 1] } }),
            json!({ "type": "OPEN", "structure": { "query": { "text": "why?" }, "options": [], "answer": null } }),
            question("q", &["a"], 0),
        ]);

        let answers = svc.extract_answers(&quiz_id("mixed")).await.unwrap();

        assert_eq!(answers.pairs, vec![pair("q", "a")]);
        assert_eq!(answers.skipped, 2);
    }

    #[tokio::test]
    async fn empty_payload_gives_empty_set() {
        let svc = service_with(vec![]);

        let answers = svc.extract_answers(&quiz_id("empty")).await.unwrap();

        assert!(answers.is_empty());
        assert_eq!(answers.skipped, 0);
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let mut mock = MockQuizSource::new();
        mock.expect_fetch().times(1).returning(|_| {
            Box::pin(async { Err(FetchError::Unreachable("connection refused".into())) })
        });
        let svc = AnswerService::new(mock);

        let err = svc.extract_answers(&quiz_id("down")).await.unwrap_err();

        assert!(matches!(err, FetchError::Unreachable(_)));
    }

    #[tokio::test]
    async fn malformed_payload_propagates() {
        let mut mock = MockQuizSource::new();
        mock.expect_fetch().times(1).returning(|_| {
            let e = serde_json::from_str::<Value>("{").unwrap_err();
            Box::pin(async move { Err(FetchError::Malformed(e)) })
        });
        let svc = AnswerService::new(mock);

        let err = svc.extract_answers(&quiz_id("broken")).await.unwrap_err();

        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn fetches_the_requested_id() {
        let mut mock = MockQuizSource::new();
        mock.expect_fetch()
            .withf(|id| id.as_str() == "wanted")
            .times(1)
            .returning(|_| Box::pin(async { Ok(RawQuizPayload::default()) }));
        let svc = AnswerService::new(mock);

        svc.extract_answers(&quiz_id("wanted")).await.unwrap();
    }
}
