use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /answers`.
#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuizId {
    #[error("quiz id must not be empty")]
    Empty,
    #[error("quiz id contains the character {0:?}")]
    ForbiddenChar(char),
    #[error("quiz id must not be a dot segment")]
    DotSegment,
}

/// Opaque identifier of a quiz on the quiz platform.
///
/// The id ends up in a URL path segment and in the filename of the
/// `Content-Disposition` header, so characters that would break either are refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizId(String);

impl QuizId {
    pub fn parse(id: impl Into<String>) -> Result<Self, InvalidQuizId> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidQuizId::Empty);
        }
        if let Some(c) = id
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || "/\\?#%\"".contains(*c))
        {
            return Err(InvalidQuizId::ForbiddenChar(c));
        }
        if id.chars().all(|c| c == '.') {
            return Err(InvalidQuizId::DotSegment);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One question with the text of its correct option, both free of markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerPair {
    pub question: String,
    pub answer: String,
}

/// The answers extracted for one quiz, in the order the quiz lists its questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    pub quiz_id: QuizId,
    pub pairs: Vec<AnswerPair>,
    /// Question records that were left out because they could not be normalized.
    pub skipped: usize,
}

impl AnswerSet {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnswerPair> {
        self.pairs.iter()
    }
}
