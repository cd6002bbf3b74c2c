//! Renderers for the news page and the writer that delivers it.
//!
//! Every renderer is a pure function of a [`ViewState`]:
//!
//! - [`html`]: Self-contained HTML page (default)
//! - [`markdown`]: Markdown document
//! - [`json`]: The `NewsData` shape, or `{"error": ..}`
//! - [`text`]: Plain terminal listing
//!
//! Sources are only rendered when there is at least one.

pub mod html;
pub mod json;
pub mod markdown;
pub mod text;

use crate::view::ViewState;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

pub const PAGE_TITLE: &str = "AI in Web Engineering";
pub const PAGE_TAGLINE: &str = "The Latest News & Trends from the Past Week, Grounded in Reality";
pub const PAGE_FOOTER: &str = "Powered by Gemini and Google Search";
pub const LOADING_TEXT: &str = "Loading the latest news…";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Html,
    Markdown,
    Json,
    Text,
}

/// Render `state` in the requested format.
///
/// # Arguments
///
/// * `format` - Which renderer to use
/// * `state` - The view to render; any of the three states is accepted
/// * `generated_at` - Timestamp printed in the footer of the human-readable formats
///
/// # Returns
///
/// The complete page as a string, ready for [`write_output`].
///
/// # Errors
///
/// Returns an error only for [`Format::Json`], if serialization fails.
pub fn render(
    format: Format,
    state: &ViewState,
    generated_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    Ok(match format {
        Format::Html => html::render(state, generated_at),
        Format::Markdown => markdown::render(state, generated_at),
        Format::Json => json::render(state)?,
        Format::Text => text::render(state, generated_at),
    })
}

/// Timestamp line shared by the human-readable renderers.
pub(crate) fn generated_line(generated_at: DateTime<Utc>) -> String {
    format!("Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC"))
}

/// Write the rendered page to `path`, or to stdout when no path is given.
///
/// # Arguments
///
/// * `rendered` - Output of [`render`]
/// * `path` - Target file, replaced if it exists; `None` for stdout
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be created or written
/// - Writing or flushing stdout fails (for example a closed pipe)
#[instrument(level = "info", skip_all, fields(bytes = rendered.len()))]
pub async fn write_output(rendered: &str, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => {
            fs::write(path, rendered).await?;
            info!(path = %path.display(), "Wrote page");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_render_dispatch() {
        let state = ready(vec![item("T", "S")], vec![]);
        assert!(render(Format::Html, &state, at()).unwrap().contains("<article"));
        assert!(render(Format::Markdown, &state, at()).unwrap().contains("## T"));
        assert!(render(Format::Json, &state, at()).unwrap().contains("\"newsItems\""));
        assert!(render(Format::Text, &state, at()).unwrap().contains("T\n"));
    }

    #[test]
    fn test_generated_line() {
        assert_eq!(generated_line(at()), "Generated 2025-05-06 14:30 UTC");
    }

    #[tokio::test]
    async fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.html");
        write_output("<p>hi</p>", Some(&path)).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_write_output_replaces_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "stale contents that are longer").unwrap();
        write_output("fresh", Some(file.path())).await.unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "fresh");
    }
}
