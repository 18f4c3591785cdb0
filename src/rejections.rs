use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{models::Message, services::fetcher::FetchError};

#[derive(Debug)]
pub enum AppError {
    Input(&'static str),
    NotFound(&'static str),
    Upstream(FetchError),
    Internal(&'static str),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Input(message) => (StatusCode::BAD_REQUEST, *message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, *message),
            AppError::Upstream(FetchError::Unreachable(_)) => {
                (StatusCode::BAD_GATEWAY, "quiz source is unreachable")
            }
            AppError::Upstream(FetchError::Malformed(_)) => (
                StatusCode::BAD_GATEWAY,
                "quiz source returned an unexpected response",
            ),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, *message),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        tracing::error!("could not fetch quiz: {e}");
        AppError::Upstream(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.status_and_message();
        let body = Message {
            message: message.to_string(),
        };
        (code, Json(body)).into_response()
    }
}

pub trait ResultExt<T> {
    /// Log the error and turn it into a 500.
    fn reject(self, message: &'static str) -> Result<T, AppError>;
    /// Log the error and turn it into a 400.
    fn reject_input(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Internal(message)
        })
    }

    fn reject_input(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::debug!("{message}: {e}");
            AppError::Input(message)
        })
    }
}
