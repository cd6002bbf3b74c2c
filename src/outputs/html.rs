//! HTML page rendering.
//!
//! Produces a single self-contained document with inline styles. All text
//! that came from the model or from citations is escaped. Only `http` and
//! `https` citations become links, and those open in a new browsing context;
//! any other scheme is shown as plain text.

use super::{LOADING_TEXT, PAGE_FOOTER, PAGE_TAGLINE, PAGE_TITLE, generated_line};
use crate::models::{GroundingChunk, NewsItem};
use crate::utils::{escape_html, linkable_uri};
use crate::view::ViewState;
use chrono::{DateTime, Utc};
use std::fmt::Write;

const STYLE: &str = "\
body{margin:0;background:#111827;color:#e5e7eb;font-family:system-ui,sans-serif}
.container{max-width:56rem;margin:0 auto;padding:2rem 1rem}
header{text-align:center;margin-bottom:2.5rem}
h1{font-size:2.75rem;color:#22d3ee;margin:0 0 .5rem}
.tagline{color:#9ca3af;font-size:1.125rem}
main{background:rgba(31,41,55,.5);border:1px solid #374151;border-radius:1rem;padding:2rem}
article{background:rgba(31,41,55,.7);border:1px solid #374151;border-radius:.75rem;padding:1.5rem;margin-bottom:2rem}
article h2,.sources h2{color:#67e8f9;margin:0 0 .75rem}
article p{color:#d1d5db;line-height:1.6;margin:0}
.sources{margin-top:2.5rem;padding-top:1.5rem;border-top:1px solid #374151}
.sources a{color:#60a5fa;word-break:break-all}
.error{background:rgba(127,29,29,.5);border:1px solid #dc2626;color:#fecaca;padding:.75rem 1rem;border-radius:.5rem}
.spinner{margin:6rem auto;width:3rem;height:3rem;border:4px solid rgba(34,211,238,.25);border-top-color:#22d3ee;border-radius:50%;animation:spin 1s linear infinite}
@keyframes spin{to{transform:rotate(360deg)}}
footer{text-align:center;margin-top:2.5rem;color:#6b7280;font-size:.875rem}
";

pub fn render(state: &ViewState, generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    );
    let _ = writeln!(html, "<title>{}</title>", escape_html(PAGE_TITLE));
    let _ = writeln!(html, "<style>\n{STYLE}</style>");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<div class=\"container\">");
    let _ = writeln!(html, "<header>");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(PAGE_TITLE));
    let _ = writeln!(html, "<p class=\"tagline\">{}</p>", escape_html(PAGE_TAGLINE));
    let _ = writeln!(html, "</header>");
    let _ = writeln!(html, "<main>");

    match state {
        ViewState::Loading => {
            let _ = writeln!(
                html,
                "<div class=\"spinner\" role=\"progressbar\" aria-busy=\"true\" aria-label=\"{}\"></div>",
                escape_html(LOADING_TEXT)
            );
        }
        ViewState::Failed { message } => {
            let _ = writeln!(
                html,
                "<div class=\"error\" role=\"alert\"><strong>Error: </strong><span>{}</span></div>",
                escape_html(message)
            );
        }
        ViewState::Ready(data) => {
            write_articles(&mut html, &data.news_items);
            if !data.sources.is_empty() {
                write_sources(&mut html, &data.sources);
            }
        }
    }

    let _ = writeln!(html, "</main>");
    let _ = writeln!(html, "<footer>");
    let _ = writeln!(html, "<p>{}</p>", escape_html(PAGE_FOOTER));
    let _ = writeln!(html, "<p>{}</p>", generated_line(generated_at));
    let _ = writeln!(html, "</footer>");
    let _ = writeln!(html, "</div>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}

fn write_articles(html: &mut String, items: &[NewsItem]) {
    let _ = writeln!(html, "<div class=\"news\">");
    for item in items {
        let _ = writeln!(
            html,
            "<article>\n<h2>{}</h2>\n<p>{}</p>\n</article>",
            escape_html(&item.title),
            escape_html(&item.summary)
        );
    }
    let _ = writeln!(html, "</div>");
}

fn write_sources(html: &mut String, sources: &[GroundingChunk]) {
    let _ = writeln!(html, "<section class=\"sources\">");
    let _ = writeln!(html, "<h2>Sources</h2>");
    let _ = writeln!(html, "<ul>");
    for source in sources {
        let text = escape_html(source.web.display_text());
        match linkable_uri(&source.web.uri) {
            Some(url) => {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
                    escape_html(url.as_str()),
                    text
                );
            }
            None => {
                let _ = writeln!(html, "<li><span>{text}</span></li>");
            }
        }
    }
    let _ = writeln!(html, "</ul>");
    let _ = writeln!(html, "</section>");
}
