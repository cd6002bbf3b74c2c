//! Error taxonomy for fetching the news digest.
//!
//! Every failure leaving [`crate::api::NewsFetcher::fetch`] is one of these
//! variants. The `Display` text is what the page shows to the reader, so it
//! never carries raw parser internals.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    /// No API credential was configured. Raised before any network I/O.
    #[error("API_KEY environment variable not set")]
    Config,

    /// The model's payload was not a JSON array of news items.
    #[error("Failed to parse the news data. The format received was invalid.")]
    Parse,

    /// The request failed in transport or the API rejected it.
    #[error("Failed to fetch news: {0}")]
    Upstream(String),

    /// Anything that could not be classified, e.g. a panic in the transport.
    #[error("An unknown error occurred while fetching news.")]
    Unknown,
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        NewsError::Upstream(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            NewsError::Config.to_string(),
            "API_KEY environment variable not set"
        );
        assert_eq!(
            NewsError::Parse.to_string(),
            "Failed to parse the news data. The format received was invalid."
        );
        assert_eq!(
            NewsError::Upstream("connection refused".to_string()).to_string(),
            "Failed to fetch news: connection refused"
        );
        assert_eq!(
            NewsError::Unknown.to_string(),
            "An unknown error occurred while fetching news."
        );
    }
}
