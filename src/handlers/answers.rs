use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName},
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::{
    models::{AnswersRequest, QuizId},
    names,
    rejections::{AppError, ResultExt},
    services::fetcher::QuizSource,
    AppState,
};

pub fn routes<S: QuizSource + Clone + 'static>() -> Router<AppState<S>> {
    Router::new().route(names::ANSWERS_URL, post(answers_pdf::<S>))
}

async fn answers_pdf<S: QuizSource + Clone + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<AnswersRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body.reject_input("request body must be a JSON object with an \"id\" field")?;
    let quiz_id = QuizId::parse(body.id).reject_input("invalid quiz id")?;

    tracing::info!("answers requested for quiz {quiz_id}");

    let answers = state.answers.extract_answers(&quiz_id).await?;
    if answers.is_empty() {
        tracing::info!(
            "no answers for quiz {quiz_id}, {} questions skipped",
            answers.skipped
        );
        return Err(AppError::NotFound("no answers found for this quiz"));
    }

    let renderer = state.renderer.clone();
    let pdf = tokio::task::spawn_blocking(move || renderer.render(&answers))
        .await
        .reject("could not render answers document")?
        .reject("could not render answers document")?;

    let file_name = names::pdf_file_name(quiz_id.as_str());

    Ok((
        [
            (header::CONTENT_TYPE, names::PDF_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                names::attachment_disposition(&file_name),
            ),
            (
                HeaderName::from_static("content-description"),
                "File Transfer".to_string(),
            ),
            (
                HeaderName::from_static("content-transfer-encoding"),
                "binary".to_string(),
            ),
        ],
        pdf,
    ))
}
