//! # AI Web News
//!
//! Fetches a digest of the past week's news on AI in web engineering from
//! Gemini, with Google Search grounding enabled, and renders it as a page
//! together with the web sources the model cited.
//!
//! ## Usage
//!
//! ```sh
//! API_KEY=... ai_web_news -o ./news.html
//! ```
//!
//! ## Flow
//!
//! 1. **Mount**: the view enters `Loading` and starts the single fetch
//! 2. **Fetch**: one grounded `generateContent` call, JSON payload extracted
//!    from the reply, citations filtered to well-formed entries
//! 3. **Settle**: the view becomes `Ready` or `Failed`
//! 4. **Render**: the settled view is written as HTML, Markdown, JSON or text

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod error;
mod gemini;
mod models;
mod outputs;
mod progress;
mod utils;
mod view;

use api::{GeminiClient, NewsFetcher};
use cli::Cli;
use outputs::{LOADING_TEXT, render, write_output};
use progress::Spinner;
use utils::ensure_writable_parent;
use view::{ViewController, ViewState};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ai_web_news starting up");

    let args = Cli::parse();
    debug!(model = %args.model, endpoint = %args.endpoint, format = ?args.format, output = ?args.output, "Parsed CLI arguments");

    // Early check: a bad output path should fail before the API call
    if let Some(path) = args.output.as_deref() {
        if let Err(e) = ensure_writable_parent(path).await {
            error!(
                path = %path.display(),
                error = %e,
                "Output location is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let transport = GeminiClient::new(args.endpoint.clone(), args.model.clone());
    let fetcher = Arc::new(NewsFetcher::new(args.api_key.clone(), transport));

    let mut view = ViewController::mount(fetcher);
    let spinner = Spinner::start(LOADING_TEXT, !args.no_spinner);
    let state = view.settled().await;
    spinner.finish();

    let rendered = render(args.format, &state, Utc::now())?;
    write_output(&rendered, args.output.as_deref()).await?;

    let elapsed = start_time.elapsed();
    match &state {
        ViewState::Ready(data) => info!(
            ?elapsed,
            items = data.news_items.len(),
            sources = data.sources.len(),
            "Execution complete"
        ),
        ViewState::Failed { message } => {
            error!(?elapsed, %message, "Execution finished with an error page");
            std::process::exit(1);
        }
        ViewState::Loading => {}
    }

    Ok(())
}
