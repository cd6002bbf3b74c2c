//! Wire types for the Gemini `generateContent` REST endpoint.
//!
//! Only the fields this tool sends or reads are modelled. Response fields are
//! all optional because the API omits them freely, and citation entries in
//! particular arrive malformed often enough that nothing here is trusted until
//! [`crate::utils::valid_sources`] has filtered it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

impl GenerateContentRequest {
    /// A single-turn user prompt with Google Search grounding enabled.
    pub fn grounded(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    thought: None,
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on reasoning parts, which are not part of the answer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, or `None` when the
    /// candidate carries no text parts at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let texts: Vec<&str> = content
            .parts
            .iter()
            .filter(|p| p.thought != Some(true))
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Search queries the model issued while grounding; empty when absent.
    pub fn web_search_queries(&self) -> &[String] {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.web_search_queries.as_deref())
            .unwrap_or(&[])
    }

    /// Raw citation entries of the first candidate; empty when absent.
    pub fn grounding_chunks(&self) -> &[Option<RawGroundingChunk>] {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.grounding_chunks.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub web_search_queries: Option<Vec<String>>,
    #[serde(default)]
    pub grounding_chunks: Option<Vec<Option<RawGroundingChunk>>>,
}

/// A citation exactly as the API sent it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGroundingChunk {
    #[serde(default)]
    pub web: Option<RawWebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounded_request_shape() {
        let req = GenerateContentRequest::grounded("hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["contents"][0]["parts"][0].get("thought").is_none());
        assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"thinking...","thought":true},
                {"text":"[{\"title\":"},
                {"text":"\"A\",\"summary\":\"B\"}]"}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            resp.text().as_deref(),
            Some(r#"[{"title":"A","summary":"B"}]"#)
        );
    }

    #[test]
    fn test_response_without_candidates() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text().is_none());
        assert!(resp.grounding_chunks().is_empty());
    }

    #[test]
    fn test_grounding_chunks_tolerate_malformed_entries() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[]"}]},
                "groundingMetadata":{"groundingChunks":[
                    {"web":{"uri":"","title":"x"}},
                    {"web":{"uri":"u","title":"t"}},
                    null,
                    {"web":null},
                    {}
                ]}}]}"#,
        )
        .unwrap();
        let chunks = resp.grounding_chunks();
        assert_eq!(chunks.len(), 5);
        assert!(resp.web_search_queries().is_empty());
        assert!(resp.finish_reason().is_none());
        assert!(chunks[2].is_none());
        assert!(chunks[3].as_ref().unwrap().web.is_none());
    }

    #[test]
    fn test_api_error_body() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(body.error.code, Some(400));
        assert_eq!(body.error.message.as_deref(), Some("API key not valid."));
        assert_eq!(body.error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}
