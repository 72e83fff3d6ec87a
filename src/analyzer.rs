//! Client for the external emotion-analysis endpoint.
//!
//! The analyzer is an external collaborator: `POST {base_url}/analyze` with a
//! JSON body `{"text": ...}` answers with a reply string and a probability
//! for each of the four emotions. Transport errors, non-success statuses, and
//! decode failures are deliberately collapsed into a single error kind; the
//! widget turns any of them into the same fallback chat message.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::widget::chart::EmotionDistribution;

/// Any failure of the analyze round-trip. The widget does not distinguish
/// between transport, status, and decode failures.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("analyze request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Request body for the analyze endpoint.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// A successful analyzer reply.
///
/// Unknown fields (the upstream also reports a dominant `emotion` label) are
/// tolerated and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    /// Bot reply to show in the chat log.
    pub response: String,
    /// Probability per emotion, replacing the previous chart contents.
    pub probabilities: EmotionDistribution,
}

/// HTTP client for the external analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AnalyzerClient {
    /// Create a client for the analyzer at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/analyze", base_url.trim_end_matches('/')),
        }
    }

    /// The resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one analyze round-trip. No retry, no timeout, no cancellation; a
    /// hung analyzer leaves the caller suspended until it resolves.
    pub async fn analyze(&self, text: &str) -> Result<Analysis, AnalyzeError> {
        debug!(name: "analyzer.request.sent", endpoint = %self.endpoint, "Analyze request sent");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&AnalyzeRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let analysis: Analysis = resp.json().await?;
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_trailing_slash() {
        let client = AnalyzerClient::new("http://localhost:5000/");
        assert_eq!(client.endpoint(), "http://localhost:5000/analyze");

        let client = AnalyzerClient::new("http://localhost:5000");
        assert_eq!(client.endpoint(), "http://localhost:5000/analyze");
    }

    #[test]
    fn analysis_tolerates_extra_fields() {
        let json = r#"{
            "emotion": "joy",
            "response": "Celebrate this win!",
            "probabilities": {"anger": 0.1, "fear": 0.1, "joy": 0.7, "sadness": 0.1}
        }"#;

        let analysis: Analysis = serde_json::from_str(json).expect("valid analysis");
        assert_eq!(analysis.response, "Celebrate this win!");
        assert!((analysis.probabilities.joy - 0.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn connection_failure_is_request_failed() {
        // Nothing listens on this port.
        let client = AnalyzerClient::new("http://127.0.0.1:9");
        let err = client.analyze("hello").await.expect_err("must fail");
        assert!(matches!(err, AnalyzeError::RequestFailed(_)));
    }
}
