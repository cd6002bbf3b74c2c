//! Helpers for normalizing model output and preparing it for display.
//!
//! - Payload extraction from markdown-fenced model replies
//! - Citation filtering down to well-formed entries
//! - String truncation for logging
//! - HTML and Markdown escaping, plus link-scheme checks, for the rendered page
//! - Output location validation

use crate::gemini::RawGroundingChunk;
use crate::models::{GroundingChunk, WebSource};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

const FENCE: &str = "```";

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("static regex"));

/// Pull the JSON payload out of a model reply.
///
/// The model is asked for a bare JSON array but sometimes fences it anyway.
/// Rules, first match wins:
///
/// 1. A block opened with ```` ```json ```` plus newline and closed by a
///    newline plus ```` ``` ```` anywhere in the text: use its interior.
/// 2. Text that both starts and ends with ```` ``` ````: drop exactly those
///    three characters at each end.
/// 3. Otherwise the text as-is.
///
/// The result is always trimmed.
///
/// # Arguments
///
/// * `text` - The raw answer text of the first candidate
///
/// # Returns
///
/// A slice of `text` holding the candidate JSON payload. Nothing is parsed
/// here; a payload that is not JSON surfaces later as a parse error.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_json_payload("```json\n[1]\n```"), "[1]");
/// assert_eq!(extract_json_payload("```[1]```"), "[1]");
/// assert_eq!(extract_json_payload("  [1] "), "[1]");
/// ```
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(inner) = JSON_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .filter(|m| !m.as_str().is_empty())
    {
        debug!("Extracted payload from json-tagged fence");
        return inner.as_str().trim();
    }

    if text.len() >= 2 * FENCE.len() && text.starts_with(FENCE) && text.ends_with(FENCE) {
        debug!("Stripped generic fence");
        return text[FENCE.len()..text.len() - FENCE.len()].trim();
    }

    text.trim()
}

/// Keep only citations with a `web` entry whose `uri` and `title` are both
/// present and non-empty.
///
/// # Arguments
///
/// * `chunks` - Citation entries exactly as the API sent them, nulls included
///
/// # Returns
///
/// The well-formed subsequence of `chunks`, in upstream order. Nothing is
/// merged or deduplicated.
pub fn valid_sources(chunks: &[Option<RawGroundingChunk>]) -> Vec<GroundingChunk> {
    chunks
        .iter()
        .flatten()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| match (web.uri.as_deref(), web.title.as_deref()) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => {
                Some(GroundingChunk {
                    web: WebSource {
                        uri: uri.to_string(),
                        title: title.to_string(),
                    },
                })
            }
            _ => None,
        })
        .collect()
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` bytes are cut at the nearest character boundary
/// at or below `max` and suffixed with `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Escape text for safe inclusion in HTML element content and
/// double-quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Check a citation URI before it becomes a clickable link.
///
/// # Arguments
///
/// * `uri` - The citation address as the model reported it
///
/// # Returns
///
/// The parsed URL when it is absolute and uses `http` or `https`; `None` for
/// anything else (`javascript:`, `data:`, relative or unparseable), which
/// callers render as plain text.
pub fn linkable_uri(uri: &str) -> Option<Url> {
    Url::parse(uri)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

/// Make model text inert inside a single Markdown line.
///
/// Line breaks collapse to single spaces so a value can never start a new
/// block (a forged heading or list). Characters Markdown or embedded HTML
/// would interpret (`\`, `#`, `<`, `>`, `[`, `]`, `` ` ``, `*`, `_`) are
/// backslash-escaped.
pub fn escape_markdown_inline(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        if matches!(c, '\\' | '#' | '<' | '>' | '[' | ']' | '`' | '*' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Ensure the directory an output file will land in exists and is writable.
///
/// Runs before the fetch so a bad `--output` path fails fast instead of
/// after the API call has been paid for. A throwaway probe file is created
/// and removed to prove the directory accepts writes.
///
/// # Arguments
///
/// * `path` - The output file that will be written later
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).await?;

    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
