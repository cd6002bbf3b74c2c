//! Gemini API interaction and response normalization.
//!
//! This module turns one grounded `generateContent` call into a [`NewsData`]
//! or a [`NewsError`].
//!
//! # Architecture
//!
//! - [`GenerateContent`]: Transport seam, one request in, one response out
//! - [`GeminiClient`]: The reqwest-backed transport
//! - [`FetchNews`]: What the view depends on
//! - [`NewsFetcher`]: Credential check, single call, payload extraction,
//!   citation filtering
//!
//! There is no retry, no explicit timeout and no caching. Each call to
//! [`FetchNews::fetch`] performs exactly one outbound request.

use crate::error::{NewsError, Result};
use crate::gemini::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::models::{NewsData, NewsItem};
use crate::utils::{extract_json_payload, truncate_for_log, valid_sources};
use async_trait::async_trait;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Fixed instruction sent with every request.
pub const NEWS_PROMPT: &str = "\
Generate a list of the latest news items and trends regarding the use of Artificial Intelligence in web engineering from the last 7 days.
Focus on recent developments, new tools, and notable projects.
For each item, provide a clear title and a concise summary.
IMPORTANT: Your response MUST be a valid JSON array of objects, where each object has a \"title\" and \"summary\" key.
Do not include any other text, markdown, or formatting outside of the JSON array itself.
Example: [{\"title\": \"Example Title\", \"summary\": \"Example summary.\"}]";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Transport for a single `generateContent` call.
///
/// Implementations report transport and API failures as
/// [`NewsError::Upstream`].
#[async_trait]
pub trait GenerateContent: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// Anything that can produce the news digest.
#[async_trait]
pub trait FetchNews: Send + Sync {
    async fn fetch(&self) -> Result<NewsData>;
}

/// reqwest-backed Gemini transport.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for one model behind one API base.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the Generative Language API; any path prefix is kept
    /// * `model` - Model id, percent-encoded into the request path
    ///
    /// # Returns
    ///
    /// A client with a fresh connection pool. No request is made until
    /// [`GenerateContent::generate`] is called.
    pub fn new(endpoint: Url, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            model: model.into(),
        }
    }

    /// Build the `generateContent` URL for the configured model.
    ///
    /// # Returns
    ///
    /// `{endpoint}/v1beta/models/{model}:generateContent`, with a trailing
    /// slash added to the endpoint path first so its prefix survives the join.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Upstream`] if the joined URL cannot be parsed.
    pub fn generate_url(&self) -> Result<Url> {
        let path = format!(
            "v1beta/models/{}:generateContent",
            urlencoding::encode(&self.model)
        );
        let base = if self.endpoint.path().ends_with('/') {
            self.endpoint.clone()
        } else {
            let mut base = self.endpoint.clone();
            base.set_path(&format!("{}/", self.endpoint.path()));
            base
        };
        base.join(&path)
            .map_err(|e| NewsError::Upstream(format!("invalid endpoint: {e}")))
    }
}

#[async_trait]
impl GenerateContent for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.generate_url()?;
        let t0 = Instant::now();
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let api_error = serde_json::from_str::<ApiErrorBody>(&body).ok().map(|b| b.error);
            warn!(
                status = status.as_u16(),
                elapsed_ms,
                api_code = ?api_error.as_ref().and_then(|e| e.code),
                api_status = ?api_error.as_ref().and_then(|e| e.status.as_deref()),
                body = %truncate_for_log(&body, 300),
                "generateContent returned an error status"
            );
            let detail = api_error
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(NewsError::Upstream(detail));
        }

        info!(status = status.as_u16(), elapsed_ms, "generateContent succeeded");
        Ok(resp.json::<GenerateContentResponse>().await?)
    }
}

/// Fetches the digest through a [`GenerateContent`] transport.
pub struct NewsFetcher<T> {
    api_key: Option<String>,
    transport: T,
}

impl<T> fmt::Debug for NewsFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsFetcher")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl<T: GenerateContent> NewsFetcher<T> {
    /// Wrap a transport with the credential used for every request.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The configured key; an empty key is treated the same as a missing one
    /// * `transport` - Where requests go
    ///
    /// # Returns
    ///
    /// A fetcher whose [`FetchNews::fetch`] fails with [`NewsError::Config`],
    /// before touching the transport, when no usable key was given.
    pub fn new(api_key: Option<String>, transport: T) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            transport,
        }
    }

    async fn request(&self, api_key: &str) -> Result<NewsData> {
        let request = GenerateContentRequest::grounded(NEWS_PROMPT);

        let response = AssertUnwindSafe(self.transport.generate(api_key, &request))
            .catch_unwind()
            .await
            .map_err(|panic| {
                let what = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!(panic = %what, "Transport panicked");
                NewsError::Unknown
            })??;

        let text = response
            .text()
            .ok_or_else(|| NewsError::Upstream("response contained no text".to_string()))?;
        debug!(
            finish_reason = ?response.finish_reason(),
            search_queries = ?response.web_search_queries(),
            response_preview = %truncate_for_log(&text, 300),
            "Model reply"
        );

        let payload = extract_json_payload(&text);
        let news_items: Vec<NewsItem> = serde_json::from_str(payload).map_err(|e| {
            error!(
                error = %e,
                payload_preview = %truncate_for_log(payload, 300),
                "Model returned non-conforming JSON"
            );
            NewsError::Parse
        })?;

        let raw_sources = response.grounding_chunks();
        let sources = valid_sources(raw_sources);
        info!(
            items = news_items.len(),
            sources = sources.len(),
            dropped_sources = raw_sources.len() - sources.len(),
            "Normalized news response"
        );

        Ok(NewsData {
            news_items,
            sources,
        })
    }
}

#[async_trait]
impl<T: GenerateContent> FetchNews for NewsFetcher<T> {
    #[instrument(level = "info", skip_all)]
    async fn fetch(&self) -> Result<NewsData> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("No API key configured");
            return Err(NewsError::Config);
        };

        let t0 = Instant::now();
        let res = self.request(api_key).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;
        match &res {
            Ok(_) => info!(elapsed_ms, "fetch succeeded"),
            Err(e) => error!(elapsed_ms, error = %e, "Error fetching or parsing news"),
        }
        res
    }
}
