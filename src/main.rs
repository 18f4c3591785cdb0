use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use quiz_answers::{
    names,
    render::PdfRenderer,
    services::{answers::AnswerService, fetcher::HttpQuizSource},
    AppState,
};
use reqwest::Url;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:8080")]
    address: String,

    /// Base URL of the quiz platform's JSON endpoint; the quiz id is appended as a path segment.
    #[arg(long, env, default_value = names::DEFAULT_QUIZ_SOURCE_URL)]
    quiz_source_url: Url,

    /// Timeout for one request to the quiz platform, in seconds.
    #[arg(long, env, default_value_t = names::DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout_secs: u64,

    /// TrueType font embedded in the generated PDFs. Helvetica is used when unset.
    #[arg(long, env)]
    font: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,quiz_answers=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let source = HttpQuizSource::new(
        args.quiz_source_url.clone(),
        Duration::from_secs(args.fetch_timeout_secs),
    )?;
    let renderer = match &args.font {
        Some(path) => PdfRenderer::with_font_file(path)?,
        None => PdfRenderer::new(),
    };
    if !renderer.embeds_font() {
        tracing::warn!(
            "no --font configured; PDFs use Helvetica and drop characters outside WinAnsi (Cyrillic, CJK, math)"
        );
    }

    let state = AppState {
        answers: AnswerService::new(source),
        renderer: Arc::new(renderer),
    };
    let routes = quiz_answers::router(state);

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(
        "listening on {address}, fetching quizzes from {}",
        args.quiz_source_url
    );
    axum::serve(listener, routes).await?;

    Ok(())
}
