//! Deepfake analysis endpoint.

use actix_web::{HttpRequest, HttpResponse, http::header::ContentType, web};

use crate::{
    AppState,
    errors::AnalyzeError,
    services::{AnalyzeOutcome, analyze_upload, extract_upload},
};

/// Analyzes one uploaded video.
///
/// # HTTP Method
/// `POST /api/analyze`
///
/// # Request Body
/// One of:
/// - `multipart/form-data` with a `video` (or `file`) file field
/// - `application/json` or url-encoded form with a `base64` string field
///
/// # Success Response (200 OK)
/// Forwarding mode relays the inference API's JSON body unchanged. Simulated mode
/// returns:
/// ```json
/// {
///   "success": true,
///   "verdict": "REAL",
///   "confidence": 74,
///   "reason": "No significant manipulation artifacts detected (74% confidence).",
///   "size_bytes": 1048576
/// }
/// ```
///
/// # Error Responses
/// - `400 Bad Request`: `{"error":"No video uploaded"}`, invalid base64, malformed body
/// - `413 Payload Too Large`: body above the configured limit
/// - `500 Internal Server Error`: `{"error":"Missing GEMINI_API_KEY"}` or
///   `{"error":"Server Error","details":"..."}`
#[tracing::instrument(
    skip(req, payload, app_state),
    fields(mode = %app_state.settings.mode)
)]
pub async fn analyze(
    req: HttpRequest,
    payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AnalyzeError> {
    let upload = extract_upload(&req, payload, app_state.settings.max_upload_bytes).await?;

    match analyze_upload(&app_state, upload).await? {
        AnalyzeOutcome::Relayed(body) => Ok(HttpResponse::Ok()
            .insert_header(ContentType::json())
            .body(body)),
        AnalyzeOutcome::Simulated(result) => Ok(HttpResponse::Ok().json(result)),
    }
}
