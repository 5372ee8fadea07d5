//! Inference API client for deepfake analysis.
//!
//! Wraps a pooled reqwest client that submits a single `generateContent` call and
//! hands the raw response body back for relaying.

use actix_web::web::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;

use crate::{config::Settings, errors::AnalyzeError, models::InferencePayload};

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Builds a client with the configured timeout applied to every call.
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(settings.gemini_timeout).build()?;
        Ok(Self {
            http,
            base_url: settings.gemini_api_base.clone(),
            model: settings.gemini_model.clone(),
        })
    }

    /// Endpoint URL without the key query parameter.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends the payload once and returns the response body verbatim.
    ///
    /// The body is checked to be JSON but is not otherwise interpreted; non-2xx
    /// answers are still relayed since callers expect the upstream's own error.
    ///
    /// # Errors
    ///
    /// * [`AnalyzeError::Upstream`] on connection failure or timeout
    /// * [`AnalyzeError::InvalidUpstreamBody`] if the body is not JSON
    #[tracing::instrument(skip(self, api_key, payload), fields(model = %self.model))]
    pub async fn generate_content(
        &self,
        api_key: &str,
        payload: &InferencePayload,
    ) -> Result<Bytes, AnalyzeError> {
        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(payload)
            .send()
            .await
            // reqwest errors carry the URL, which includes the key
            .map_err(|e| AnalyzeError::Upstream(e.without_url()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| AnalyzeError::Upstream(e.without_url()))?;

        serde_json::from_slice::<IgnoredAny>(&body).map_err(AnalyzeError::InvalidUpstreamBody)?;

        if status.is_success() {
            tracing::info!(status = status.as_u16(), body_len = body.len(), "inference response received");
        } else {
            tracing::warn!(status = status.as_u16(), body_len = body.len(), "inference API returned an error status");
        }

        Ok(body)
    }
}
