//! Command-line interface definitions for AI Web News.
//!
//! Every option can be given as a flag or through the environment. The only
//! value without a default is the API key, and its absence is reported by the
//! fetcher rather than by argument parsing so that the page can render it.

use crate::api::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::outputs::Format;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for the AI Web News page.
///
/// # Examples
///
/// ```sh
/// # Render the HTML page to stdout
/// API_KEY=... ai_web_news > news.html
///
/// # Markdown into a file
/// ai_web_news --api-key ... -f markdown -o ./out/news.md
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Gemini API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "NEWS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the generative-AI API
    #[arg(long, env = "NEWS_API_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    pub format: Format,

    /// Write the page here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not show the loading spinner
    #[arg(long)]
    pub no_spinner: bool,
}
