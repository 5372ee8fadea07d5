//! The analyze step: validate, then forward to the inference API or simulate.
//!
//! Returns an explicit outcome so the handler only has to pick a response shape.

use actix_web::web::Bytes;

use crate::{
    AppState,
    config::{AnalyzeMode, DEFAULT_MIME_TYPE},
    detection::simulate,
    errors::AnalyzeError,
    models::{AnalysisResult, InferencePayload, Upload},
};

/// Successful result of analyzing one upload.
#[derive(Debug)]
pub enum AnalyzeOutcome {
    /// Raw JSON body from the inference API, to be passed through untouched
    Relayed(Bytes),
    /// Locally fabricated result
    Simulated(AnalysisResult),
}

/// Runs one upload through the configured mode.
///
/// Validation happens before the mode is consulted, so an empty or undecodable
/// upload is rejected the same way in both modes. In forwarding mode a single
/// outbound call is made; there are no retries.
pub async fn analyze_upload(
    app_state: &AppState,
    upload: Upload,
) -> Result<AnalyzeOutcome, AnalyzeError> {
    if upload.is_empty() {
        return Err(AnalyzeError::NoUpload);
    }
    let size_bytes = upload.size_bytes()?;
    let settings = &app_state.settings;

    match settings.mode {
        AnalyzeMode::Simulate => {
            let result = simulate(&mut rand::rng(), size_bytes);
            tracing::info!(
                size_bytes,
                verdict = %result.verdict,
                confidence = ?result.confidence,
                "simulated analysis complete"
            );
            Ok(AnalyzeOutcome::Simulated(result))
        }
        AnalyzeMode::Forward => {
            let api_key = settings
                .gemini_api_key
                .as_deref()
                .ok_or(AnalyzeError::MissingApiKey)?;

            let mime_type = upload
                .declared_video_mime()
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string();
            tracing::info!(size_bytes, mime_type = %mime_type, "forwarding upload to inference API");

            let payload =
                InferencePayload::for_video(mime_type, upload.into_base64(), settings.prompt.clone());
            let body = app_state.gemini.generate_content(api_key, &payload).await?;
            Ok(AnalyzeOutcome::Relayed(body))
        }
    }
}
