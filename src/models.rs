//! Data models for the news digest and its citations.
//!
//! This module defines the structures handed from the fetcher to the view:
//! - [`NewsItem`]: One summarized development, as produced by the model
//! - [`WebSource`] / [`GroundingChunk`]: One web citation backing the digest
//! - [`NewsData`]: The complete result of a successful fetch
//!
//! The serialized field names follow the camelCase shape the page has always
//! exposed (`newsItems`, `sources[].web.uri`), so the JSON output stays stable.

use serde::{Deserialize, Serialize};

/// A single news item summarized by the model.
///
/// Items have no identity beyond their position in [`NewsData::news_items`].
/// Both fields are required when parsing model output; a payload missing
/// either one is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// The headline for the development.
    pub title: String,
    /// A concise summary of the development.
    pub summary: String,
}

/// A web page cited by the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebSource {
    /// Address of the cited page. Never empty once validated.
    pub uri: String,
    /// Title of the cited page. Never empty once validated.
    pub title: String,
}

impl WebSource {
    /// Text to show for the citation link: the title, or the raw URI when
    /// the title is blank.
    pub fn display_text(&self) -> &str {
        if self.title.is_empty() {
            &self.uri
        } else {
            &self.title
        }
    }
}

/// A validated citation, mirroring the upstream `{ "web": { .. } }` shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroundingChunk {
    pub web: WebSource,
}

/// The atomic result of one successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsData {
    /// Items in the order the model returned them.
    pub news_items: Vec<NewsItem>,
    /// Well-formed citations in upstream order.
    pub sources: Vec<GroundingChunk>,
}
