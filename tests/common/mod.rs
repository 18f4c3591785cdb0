#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use quiz_answers::{
    render::PdfRenderer,
    services::{answers::AnswerService, fetcher::HttpQuizSource},
    AppState,
};
use reqwest::Url;

pub const FIXTURE_ABC123: &str = include_str!("../fixtures/quiz_abc123.json");

/// How the stub quiz platform answers for one quiz id.
#[derive(Clone)]
pub enum StubReply {
    Json(StatusCode, String),
    Html(StatusCode, String),
    Slow(Duration),
}

type Quizzes = Arc<HashMap<String, StubReply>>;

async fn quiz(State(quizzes): State<Quizzes>, Path(id): Path<String>) -> Response {
    match quizzes.get(&id).cloned() {
        Some(StubReply::Json(code, body)) => {
            (code, [(CONTENT_TYPE, "application/json")], body).into_response()
        }
        Some(StubReply::Html(code, body)) => {
            (code, [(CONTENT_TYPE, "text/html")], body).into_response()
        }
        Some(StubReply::Slow(delay)) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "{}").into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            r#"{"success":false,"message":"quiz not found"}"#,
        )
            .into_response(),
    }
}

/// Serve a stand-in for the quiz platform on an ephemeral port and return its base url.
pub async fn spawn_quiz_platform(quizzes: Vec<(&str, StubReply)>) -> Url {
    let quizzes: Quizzes = Arc::new(
        quizzes
            .into_iter()
            .map(|(id, reply)| (id.to_string(), reply))
            .collect(),
    );
    let app = Router::new()
        .route("/quiz/{id}", get(quiz))
        .with_state(quizzes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub quiz platform");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub quiz platform");
    });

    format!("http://{addr}/quiz/").parse().expect("stub url")
}

/// A base url nothing listens on.
pub async fn closed_port_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway address");
    drop(listener);
    format!("http://{addr}/quiz/").parse().expect("closed url")
}

pub fn source(base: Url) -> HttpQuizSource {
    HttpQuizSource::new(base, Duration::from_millis(500)).expect("http quiz source")
}

pub fn app(base: Url) -> Router {
    quiz_answers::router(AppState {
        answers: AnswerService::new(source(base)),
        renderer: Arc::new(PdfRenderer::new()),
    })
}
