//! JSON rendering for machine consumers.
//!
//! A ready page serializes as the `NewsData` shape:
//!
//! ```text
//! {
//!   "newsItems": [{ "title": "..", "summary": ".." }],
//!   "sources":   [{ "web": { "uri": "..", "title": ".." } }]
//! }
//! ```
//!
//! A failed page serializes as `{"error": ".."}` and a loading page as
//! `{"loading": true}`.

use crate::view::ViewState;
use serde_json::json;

pub fn render(state: &ViewState) -> Result<String, serde_json::Error> {
    match state {
        ViewState::Loading => serde_json::to_string_pretty(&json!({ "loading": true })),
        ViewState::Failed { message } => serde_json::to_string_pretty(&json!({ "error": message })),
        ViewState::Ready(data) => serde_json::to_string_pretty(data),
    }
}
