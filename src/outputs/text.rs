//! Plain-text rendering for reading in a terminal.

use super::{LOADING_TEXT, PAGE_FOOTER, PAGE_TAGLINE, PAGE_TITLE, generated_line};
use crate::view::ViewState;
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub fn render(state: &ViewState, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{PAGE_TITLE}");
    let _ = writeln!(out, "{PAGE_TAGLINE}\n");

    match state {
        ViewState::Loading => {
            let _ = writeln!(out, "{LOADING_TEXT}\n");
        }
        ViewState::Failed { message } => {
            let _ = writeln!(out, "Error: {message}\n");
        }
        ViewState::Ready(data) => {
            for item in &data.news_items {
                let _ = writeln!(out, "{}\n{}\n", item.title, item.summary);
            }
            if !data.sources.is_empty() {
                let _ = writeln!(out, "Sources");
                for source in &data.sources {
                    if source.web.title.is_empty() {
                        let _ = writeln!(out, "  ‣ {}", source.web.uri);
                    } else {
                        let _ = writeln!(out, "  ‣ {} <{}>", source.web.title, source.web.uri);
                    }
                }
                out.push('\n');
            }
        }
    }

    let _ = writeln!(out, "{PAGE_FOOTER}. {}", generated_line(generated_at));
    out
}
