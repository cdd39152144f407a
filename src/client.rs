//! Research-brief backend client
//!
//! Two endpoints:
//! - `GET {base}/health` - reachability probe (5s timeout)
//! - `POST {base}/brief` - run research, returns a brief (300s timeout,
//!   research can take minutes)
//!
//! The backend contract is external and unverified: the brief may arrive
//! wrapped in a `final_brief` envelope or as the bare object, and every
//! field of it is optional.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Health probe timeout
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
/// Brief request timeout; generous because the backend researches live
const BRIEF_TIMEOUT: Duration = Duration::from_secs(300);

/// Request body for POST /brief
#[derive(Debug, Clone, Serialize)]
pub struct BriefRequest {
    pub topic: String,
    pub depth: u8,
    pub follow_up: bool,
    pub user_id: String,
    pub conversation_history: Vec<HistoryContext>,
}

/// One prior exchange, sent for context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryContext {
    pub query: String,
    pub response: String,
}

/// Structured research brief returned by the backend.
///
/// Consumed, not owned: absent fields are rendered with placeholders, so
/// everything deserializes as optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchBrief {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub research_depth: Option<DepthValue>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub detailed_analysis: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Depth as reported by the backend - integer level or a label
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepthValue {
    Level(i64),
    Label(String),
}

impl std::fmt::Display for DepthValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Level(n) => write!(f, "{}", n),
            Self::Label(s) => write!(f, "{}", s),
        }
    }
}

/// A cited source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub metadata: SourceMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Failures at the request boundary; none of these are fatal to the session
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid response JSON: {source}. Response preview: {preview}")]
    Decode {
        source: serde_json::Error,
        preview: String,
    },
}

/// HTTP client for the research-brief backend
pub struct BriefClient {
    http: reqwest::Client,
    base_url: String,
}

impl BriefClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize_base(base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the client at a different backend (the /backend override)
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = normalize_base(base_url.into());
    }

    /// Probe GET /health. True only on a 200; any other status or a
    /// network failure counts as unreachable.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::debug!("health probe failed: {}", e);
                false
            }
        }
    }

    /// POST /brief and extract the brief from either response shape.
    pub async fn create_brief(&self, request: &BriefRequest) -> Result<ResearchBrief, ClientError> {
        let url = format!("{}/brief", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(BRIEF_TIMEOUT)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let text = response.text().await?;
        parse_brief_response(&text)
    }
}

fn normalize_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Extract a brief from the response body.
///
/// The backend may wrap the brief under `final_brief` or return it bare;
/// the wrapper key is checked first. This dual-shape tolerance is part of
/// the (unverified) backend contract and is kept deliberately.
pub fn parse_brief_response(body: &str) -> Result<ResearchBrief, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| decode_error(e, body))?;

    let brief_value = match value.get("final_brief") {
        Some(inner) => inner.clone(),
        None => value,
    };

    serde_json::from_value(brief_value).map_err(|e| decode_error(e, body))
}

fn decode_error(source: serde_json::Error, body: &str) -> ClientError {
    let preview: String = body.chars().take(500).collect();
    ClientError::Decode { source, preview }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = BriefRequest {
            topic: "Research the impact of AI on healthcare".into(),
            depth: 2,
            follow_up: false,
            user_id: "user-123".into(),
            conversation_history: vec![HistoryContext {
                query: "earlier question".into(),
                response: "earlier answer".into(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topic"], "Research the impact of AI on healthcare");
        assert_eq!(json["depth"], 2);
        assert_eq!(json["follow_up"], false);
        assert_eq!(json["conversation_history"][0]["query"], "earlier question");
    }

    #[test]
    fn test_parse_wrapped_brief() {
        let body = r#"{"final_brief": {"topic": "X", "sources": []}}"#;
        let brief = parse_brief_response(body).unwrap();
        assert_eq!(brief.topic.as_deref(), Some("X"));
        assert!(brief.sources.is_empty());
    }

    #[test]
    fn test_parse_bare_brief() {
        let body = r#"{"topic": "Y", "key_findings": ["a", "b"]}"#;
        let brief = parse_brief_response(body).unwrap();
        assert_eq!(brief.topic.as_deref(), Some("Y"));
        assert_eq!(brief.key_findings.len(), 2);
    }

    #[test]
    fn test_parse_empty_object_defaults_everything() {
        let brief = parse_brief_response("{}").unwrap();
        assert!(brief.topic.is_none());
        assert!(brief.executive_summary.is_none());
        assert!(brief.key_findings.is_empty());
        assert!(brief.sources.is_empty());
    }

    #[test]
    fn test_parse_depth_value_shapes() {
        let brief = parse_brief_response(r#"{"research_depth": 3}"#).unwrap();
        assert_eq!(brief.research_depth.unwrap().to_string(), "3");

        let brief = parse_brief_response(r#"{"research_depth": "deep"}"#).unwrap();
        assert_eq!(brief.research_depth.unwrap().to_string(), "deep");
    }

    #[test]
    fn test_parse_malformed_body_is_decode_error() {
        let err = parse_brief_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_source_with_partial_metadata() {
        let body = r#"{"sources": [{"metadata": {"title": "Paper"}}, {}]}"#;
        let brief = parse_brief_response(body).unwrap();
        assert_eq!(brief.sources.len(), 2);
        assert_eq!(brief.sources[0].metadata.title.as_deref(), Some("Paper"));
        assert!(brief.sources[1].metadata.url.is_none());
    }

    #[test]
    fn test_base_url_normalized() {
        let client = BriefClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
