//! Markdown rendering.
//!
//! Model and citation text is escaped onto a single line with
//! [`escape_markdown_inline`], so it can never open a heading, list or raw
//! HTML block of its own. Only `http`/`https` citations become links.

use super::{LOADING_TEXT, PAGE_FOOTER, PAGE_TAGLINE, PAGE_TITLE, generated_line};
use crate::models::GroundingChunk;
use crate::utils::{escape_markdown_inline, linkable_uri};
use crate::view::ViewState;
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub fn render(state: &ViewState, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {PAGE_TITLE}\n");
    let _ = writeln!(md, "_{PAGE_TAGLINE}_\n");

    match state {
        ViewState::Loading => {
            let _ = writeln!(md, "{LOADING_TEXT}\n");
        }
        ViewState::Failed { message } => {
            let _ = writeln!(md, "> **Error:** {}\n", escape_markdown_inline(message));
        }
        ViewState::Ready(data) => {
            for item in &data.news_items {
                let _ = writeln!(md, "## {}\n", escape_markdown_inline(&item.title));
                let _ = writeln!(md, "{}\n", escape_markdown_inline(&item.summary));
            }
            if !data.sources.is_empty() {
                let _ = writeln!(md, "## Sources\n");
                for source in &data.sources {
                    let _ = writeln!(md, "- {}", source_entry(source));
                }
                md.push('\n');
            }
        }
    }

    let _ = writeln!(md, "---\n");
    let _ = writeln!(md, "{PAGE_FOOTER}. {}", generated_line(generated_at));
    md
}

fn source_entry(source: &GroundingChunk) -> String {
    let text = escape_markdown_inline(source.web.display_text());
    match linkable_uri(&source.web.uri) {
        Some(url) => format!("[{}]({})", text, url.as_str().replace(')', "%29")),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_ready_with_sources() {
        let md = render(
            &ready(
                vec![item("T", "S")],
                vec![source("https://a.dev", "A [beta]"), source("https://b.dev/(x)", "")],
            ),
            at(),
        );
        assert!(md.contains("## T\n\nS\n"));
        assert!(md.contains("## Sources\n\n- [A \\[beta\\]](https://a.dev/)\n"));
        assert!(md.contains("- [https://b.dev/(x)](https://b.dev/(x%29)"));
    }

    #[test]
    fn test_ready_without_sources_omits_section() {
        let md = render(&ready(vec![item("T", "S")], vec![]), at());
        assert!(!md.contains("## Sources"));
    }

    #[test]
    fn test_model_text_cannot_forge_blocks() {
        let md = render(
            &ready(
                vec![item(
                    "Title\n## Sources\n- [fake](https://evil)",
                    "<script>alert(1)</script>",
                )],
                vec![],
            ),
            at(),
        );
        assert!(!md.contains("## Sources"));
        assert!(!md.lines().any(|l| l.starts_with("- ")));
        assert!(!md.contains("[fake]("));
        assert!(!md.contains("<script>"));
        assert!(md.contains("## Title \\#\\# Sources - \\[fake\\](https://evil)\n"));
        assert!(md.contains("\\<script\\>alert(1)\\</script\\>"));
    }

    #[test]
    fn test_non_web_source_is_plain_text() {
        let md = render(
            &ready(
                vec![item("T", "S")],
                vec![source("javascript:alert(document.cookie)", "Click")],
            ),
            at(),
        );
        assert!(md.contains("## Sources\n\n- Click\n"));
        assert!(!md.contains("javascript:"));
    }

    #[test]
    fn test_failed() {
        let md = render(&failed("boom"), at());
        assert!(md.contains("> **Error:** boom"));
        assert!(!md.contains("## "));
    }

    #[test]
    fn test_loading() {
        let md = render(&crate::view::ViewState::Loading, at());
        assert!(md.contains(LOADING_TEXT));
    }
}
