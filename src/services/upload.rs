//! Upload extraction for `POST /api/analyze`.
//!
//! The endpoint accepts three body encodings, selected by `Content-Type`:
//! - `multipart/form-data` with a `video`/`file` file field or a `base64` text field
//! - `application/json` with a `base64` field
//! - `application/x-www-form-urlencoded` with a `base64` field
//!
//! Anything else (including an empty body) is treated as no upload at all. The
//! whole body is buffered in memory, bounded by the configured limit.

use actix_multipart::Multipart;
use actix_web::{
    HttpRequest,
    http::header,
    web::{self, BytesMut},
};
use futures::StreamExt;

use crate::{
    errors::AnalyzeError,
    models::{Base64Body, Upload},
};

/// Multipart field names that carry the video file.
const FILE_FIELDS: [&str; 2] = ["video", "file"];
const BASE64_FIELD: &str = "base64";

/// Reads the upload out of the request body.
///
/// # Errors
///
/// * [`AnalyzeError::NoUpload`] if no non-empty file or base64 field is present
/// * [`AnalyzeError::MalformedBody`] if the body cannot be parsed
/// * [`AnalyzeError::PayloadTooLarge`] if more than `limit` bytes arrive
pub async fn extract_upload(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<Upload, AnalyzeError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let essence = content_type.split(';').next().unwrap_or_default().trim();

    match essence {
        "multipart/form-data" => from_multipart(Multipart::new(req.headers(), payload), limit).await,
        "application/x-www-form-urlencoded" => {
            let body = read_body(payload, limit).await?;
            let parsed: Base64Body = serde_urlencoded::from_bytes(&body)
                .map_err(|e| AnalyzeError::MalformedBody(e.to_string()))?;
            from_base64_body(parsed)
        }
        json if json == "application/json" || json.ends_with("+json") => {
            let body = read_body(payload, limit).await?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Err(AnalyzeError::NoUpload);
            }
            let parsed: Base64Body = serde_json::from_slice(&body)
                .map_err(|e| AnalyzeError::MalformedBody(e.to_string()))?;
            from_base64_body(parsed)
        }
        other => {
            tracing::debug!(content_type = other, "unsupported content type, no upload read");
            Err(AnalyzeError::NoUpload)
        }
    }
}

fn from_base64_body(body: Base64Body) -> Result<Upload, AnalyzeError> {
    body.base64
        .as_deref()
        .and_then(|raw| Upload::from_base64_text(raw, body.mime_type.clone()))
        .ok_or(AnalyzeError::NoUpload)
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<BytesMut, AnalyzeError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AnalyzeError::MalformedBody(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(AnalyzeError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn from_multipart(mut multipart: Multipart, limit: usize) -> Result<Upload, AnalyzeError> {
    let mut file: Option<Upload> = None;
    let mut base64: Option<String> = None;
    let mut total = 0usize;

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|e| AnalyzeError::MalformedBody(e.to_string()))?;

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());
        let wanted = FILE_FIELDS.contains(&name.as_str()) || name == BASE64_FIELD;

        // Unrelated fields are drained but still count toward the limit.
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AnalyzeError::MalformedBody(e.to_string()))?;
            total += chunk.len();
            if total > limit {
                return Err(AnalyzeError::PayloadTooLarge { limit });
            }
            if wanted {
                data.extend_from_slice(&chunk);
            }
        }

        if FILE_FIELDS.contains(&name.as_str()) {
            if file.is_none() && !data.is_empty() {
                tracing::debug!(field = %name, filename = ?filename, size = data.len(), "received file field");
                file = Some(Upload::File {
                    bytes: data,
                    filename,
                    content_type,
                });
            }
        } else if name == BASE64_FIELD && base64.is_none() {
            let text = String::from_utf8(data)
                .map_err(|e| AnalyzeError::MalformedBody(format!("base64 field: {e}")))?;
            base64 = Some(text);
        }
    }

    match file {
        Some(file) => Ok(file),
        None => base64
            .as_deref()
            .and_then(|raw| Upload::from_base64_text(raw, None))
            .ok_or(AnalyzeError::NoUpload),
    }
}
