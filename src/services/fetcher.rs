use std::time::Duration;

use color_eyre::Result;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::{models::QuizId, names};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be completed: DNS, connection, timeout or body read.
    #[error("quiz source is unreachable: {0}")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The body is not the JSON document the quiz platform is expected to return.
    #[error("quiz source returned a malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl FetchError {
    fn unreachable(e: reqwest::Error) -> Self {
        Self::Unreachable(Box::new(e))
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The quiz platform's response, reduced to the question records.
///
/// Each record is kept as raw JSON so a single odd record can be dropped later
/// without failing the whole payload.
#[derive(Debug, Clone, Default)]
pub struct RawQuizPayload {
    pub questions: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct Envelope {
    success: Option<bool>,
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    quiz: Option<EnvelopeQuiz>,
}

#[derive(Deserialize)]
struct EnvelopeQuiz {
    info: Option<EnvelopeInfo>,
}

#[derive(Deserialize)]
struct EnvelopeInfo {
    questions: Option<Vec<serde_json::Value>>,
}

impl RawQuizPayload {
    /// Decode a quiz platform response body. `success: false` or a missing quiz
    /// gives an empty payload rather than an error.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;

        if envelope.success == Some(false) {
            return Ok(Self::default());
        }

        let questions = envelope
            .data
            .and_then(|d| d.quiz)
            .and_then(|q| q.info)
            .and_then(|i| i.questions)
            .unwrap_or_default();

        Ok(Self { questions })
    }
}

// ---------------------------------------------------------------------------
// QuizSource trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait QuizSource: Send + Sync {
    /// Retrieve the raw payload of one quiz. Exactly one attempt is made.
    fn fetch(
        &self,
        id: &QuizId,
    ) -> impl std::future::Future<Output = Result<RawQuizPayload, FetchError>> + Send;
}

// ---------------------------------------------------------------------------
// HttpQuizSource
// ---------------------------------------------------------------------------

/// Fetches quizzes from the platform's public JSON endpoint, `<base_url>/<id>`.
#[derive(Clone)]
pub struct HttpQuizSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpQuizSource {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            color_eyre::eyre::bail!("quiz source url {base_url} cannot be used as a base");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(names::USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn quiz_url(&self, id: &QuizId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }
}

/// Statuses that say the platform could not serve the quiz at all, whatever the body.
/// A 404 or other 4xx still carries the platform's own "no such quiz" answer.
fn upstream_is_down(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

impl QuizSource for HttpQuizSource {
    async fn fetch(&self, id: &QuizId) -> Result<RawQuizPayload, FetchError> {
        let url = self.quiz_url(id);
        tracing::debug!("fetching quiz from {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::unreachable)?;

        let status = resp.status();
        if upstream_is_down(status) {
            tracing::warn!("quiz source answered {status} for quiz {id}");
            return Err(FetchError::Unreachable(
                format!("quiz source answered {status}").into(),
            ));
        }
        if !status.is_success() {
            tracing::debug!("quiz source answered {status} for quiz {id}");
        }

        let body = resp.bytes().await.map_err(FetchError::unreachable)?;

        RawQuizPayload::from_slice(&body).map_err(FetchError::Malformed)
    }
}
