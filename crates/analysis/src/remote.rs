//! Remote analysis service client

use std::time::Duration;

use chalkboard_config::AnalysisConfig;
use tracing::debug;

use crate::protocol::{GenerateContentRequest, GenerateContentResponse};
use crate::{AnalysisBackend, AnalysisError, AnalysisRequest};

/// Client for a generateContent-style HTTP endpoint
#[derive(Clone)]
pub struct RemoteAnalysis {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    system_instruction: String,
}

impl RemoteAnalysis {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            system_instruction: config.system_instruction.clone(),
        })
    }

    /// Full URL of the generateContent call
    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl AnalysisBackend for RemoteAnalysis {
    async fn analyze(&mut self, request: AnalysisRequest) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        let body = GenerateContentRequest::image_prompt(
            &self.system_instruction,
            request.snapshot.base64_payload(),
            &request.prompt,
        );

        debug!("POST {} ({} byte image)", self.url(), request.snapshot.len());
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FAILURE_MESSAGE, analyze_or_message};
    use painting::{CpuSurface, Snapshot};

    #[test]
    fn test_url() {
        let config = AnalysisConfig {
            endpoint: "https://example.test/v1beta/".into(),
            model: "vision-1".into(),
            ..AnalysisConfig::default()
        };
        let remote = RemoteAnalysis::new(&config).unwrap();
        assert_eq!(
            remote.url(),
            "https://example.test/v1beta/models/vision-1:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let mut remote = RemoteAnalysis::new(&AnalysisConfig::default()).unwrap();
        let snapshot = Snapshot::encode(&CpuSurface::new(2, 2)).unwrap();

        let err = remote
            .analyze(AnalysisRequest::new(snapshot.clone(), "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingApiKey));

        let text = analyze_or_message(&mut remote, AnalysisRequest::new(snapshot, "hi")).await;
        assert_eq!(text, FAILURE_MESSAGE);
    }
}
