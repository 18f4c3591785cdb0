pub const ANSWERS_URL: &str = "/answers";

pub const DEFAULT_QUIZ_SOURCE_URL: &str = "https://quizizz.com/quiz/";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const USER_AGENT: &str = concat!("quiz-answers/", env!("CARGO_PKG_VERSION"));

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub fn pdf_file_name(quiz_id: &str) -> String {
    format!("{quiz_id}.pdf")
}

pub fn attachment_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}
