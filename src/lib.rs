pub mod handlers;
pub mod markup;
pub mod models;
pub mod names;
pub mod rejections;
pub mod render;
pub mod services;

use std::sync::Arc;

use axum::Router;

use services::{
    answers::AnswerService,
    fetcher::{HttpQuizSource, QuizSource},
};

pub struct AppState<S: QuizSource = HttpQuizSource> {
    pub answers: AnswerService<S>,
    pub renderer: Arc<render::PdfRenderer>,
}

impl<S: QuizSource + Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            answers: self.answers.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

pub fn router<S: QuizSource + Clone + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .merge(handlers::answers::routes::<S>())
        .with_state(state)
}
