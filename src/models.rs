//! Data models for uploads, inference requests, and analysis results.
//!
//! Nothing here outlives a single request except [`AppState`], which holds the
//! read-only settings and the pooled outbound HTTP client.

use std::{fmt, sync::Arc};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::{config::Settings, detection::GeminiClient};

/// A video received by `POST /api/analyze`.
///
/// File uploads keep their raw bytes; base64 uploads keep the caller's text so it
/// can be forwarded without a decode/encode round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    /// Multipart file field (`video` or `file`)
    File {
        bytes: Vec<u8>,
        filename: Option<String>,
        content_type: Option<String>,
    },
    /// Inline base64 string (`base64` field), already stripped of any data-URL prefix
    Base64 {
        data: String,
        mime_type: Option<String>,
    },
}

impl Upload {
    /// Whether the upload carries no content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Upload::File { bytes, .. } => bytes.is_empty(),
            Upload::Base64 { data, .. } => data.trim().is_empty(),
        }
    }

    /// MIME type declared by the caller, if it names a video format.
    pub fn declared_video_mime(&self) -> Option<&str> {
        let mime = match self {
            Upload::File { content_type, .. } => content_type.as_deref(),
            Upload::Base64 { mime_type, .. } => mime_type.as_deref(),
        }?;
        mime.starts_with("video/").then_some(mime)
    }

    /// Size of the video in bytes, validating base64 input along the way.
    ///
    /// Base64 text is decoded in fixed-size steps into one scratch buffer, so
    /// measuring never holds the whole decoded video.
    pub fn size_bytes(&self) -> Result<u64, base64::DecodeError> {
        match self {
            Upload::File { bytes, .. } => Ok(bytes.len() as u64),
            Upload::Base64 { data, .. } => decoded_len(data),
        }
    }

    /// Base64 text for the inline data part.
    pub fn into_base64(self) -> String {
        match self {
            Upload::File { bytes, .. } => STANDARD.encode(bytes),
            Upload::Base64 { data, .. } => data,
        }
    }

    /// Builds a base64 upload from caller text.
    ///
    /// Whitespace is dropped and a `data:<mime>;base64,` prefix is split off, its
    /// MIME type used unless `mime_override` names a video type. Returns `None` for
    /// blank input.
    pub fn from_base64_text(raw: &str, mime_override: Option<String>) -> Option<Self> {
        let compact: String = raw.split_ascii_whitespace().collect();
        if compact.is_empty() {
            return None;
        }

        let (prefix_mime, data) = match compact
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
        {
            Some((mime, data)) => (Some(mime.to_string()), data.to_string()),
            None => (None, compact),
        };
        if data.is_empty() {
            return None;
        }

        Some(Upload::Base64 {
            data,
            mime_type: pick_mime(mime_override, prefix_mime),
        })
    }
}

/// Base64 characters decoded per step when measuring. A multiple of four.
const DECODE_CHUNK: usize = 4096;

fn decoded_len(data: &str) -> Result<u64, base64::DecodeError> {
    let bytes = data.as_bytes();
    let mut scratch = Vec::with_capacity(DECODE_CHUNK / 4 * 3);
    let mut total = 0u64;

    for (index, chunk) in bytes.chunks(DECODE_CHUNK).enumerate() {
        let offset = index * DECODE_CHUNK;
        let is_last = offset + chunk.len() == bytes.len();
        // Padding is only valid in the final quantum.
        if let Some(pos) = chunk.iter().position(|&b| b == b'=').filter(|_| !is_last) {
            return Err(base64::DecodeError::InvalidByte(offset + pos, b'='));
        }

        scratch.clear();
        STANDARD.decode_vec(chunk, &mut scratch)?;
        total += scratch.len() as u64;
    }

    Ok(total)
}

/// A `video/*` override beats the data-URL prefix; anything else only fills a gap.
fn pick_mime(mime_override: Option<String>, prefix_mime: Option<String>) -> Option<String> {
    match mime_override.filter(|m| !m.trim().is_empty()) {
        Some(mime) if mime.starts_with("video/") => Some(mime),
        other => prefix_mime.or(other),
    }
}

/// Body accepted by the JSON and url-encoded variants of the analyze endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct Base64Body {
    /// Base64 video, optionally prefixed with `data:<mime>;base64,`
    pub base64: Option<String>,
    /// Optional MIME override for the inline part
    #[serde(alias = "mimeType")]
    pub mime_type: Option<String>,
}

/// Request body for the `generateContent` endpoint.
///
/// # Examples
///
/// ```json
/// {
///   "contents": [{
///     "role": "user",
///     "parts": [
///       { "inlineData": { "mimeType": "video/mp4", "data": "AAEC..." } },
///       { "text": "Analyze this video ..." }
///     ]
///   }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InferencePayload {
    pub contents: Vec<Content>,
}

/// One role-tagged turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A single content part: inline media or text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

/// Media bytes embedded in a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InferencePayload {
    /// Builds a single user turn: the inline video followed by the instruction.
    pub fn for_video(mime_type: impl Into<String>, base64_data: String, prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.into(),
                            data: base64_data,
                        },
                    },
                    Part::Text {
                        text: prompt.into(),
                    },
                ],
            }],
        }
    }
}

/// Binary classification returned in simulated mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Deepfake,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Real => f.write_str("REAL"),
            Verdict::Deepfake => f.write_str("DEEPFAKE"),
        }
    }
}

/// Flat JSON result returned to the caller.
///
/// ```json
/// {
///   "success": true,
///   "verdict": "DEEPFAKE",
///   "confidence": 87,
///   "reason": "...",
///   "size_bytes": 10240
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub success: bool,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
    pub reason: String,
    /// Size of the decoded upload
    pub size_bytes: u64,
}

/// Shared application state for all handlers.
///
/// Cloned into every actix worker; the settings are immutable after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub gemini: GeminiClient,
}

impl AppState {
    /// Creates the state from already-loaded settings.
    ///
    /// # Errors
    ///
    /// Fails if the outbound HTTP client cannot be constructed.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let gemini = GeminiClient::new(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            gemini,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_serializes_in_generate_content_shape() {
        let payload = InferencePayload::for_video("video/mp4", "AAEC".to_string(), "is it fake?");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "video/mp4", "data": "AAEC" } },
                        { "text": "is it fake?" }
                    ]
                }]
            })
        );
    }

    #[test]
    fn analysis_result_uses_uppercase_verdicts() {
        let result = AnalysisResult {
            success: true,
            verdict: Verdict::Deepfake,
            confidence: Some(91),
            reason: "artifacts".into(),
            size_bytes: 10,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["verdict"], "DEEPFAKE");
        assert_eq!(value["confidence"], 91);
        assert_eq!(value["size_bytes"], 10);
    }

    #[test]
    fn only_video_mime_types_are_honoured() {
        let upload = Upload::File {
            bytes: vec![1],
            filename: Some("clip.webm".into()),
            content_type: Some("video/webm".into()),
        };
        assert_eq!(upload.declared_video_mime(), Some("video/webm"));

        let upload = Upload::File {
            bytes: vec![1],
            filename: None,
            content_type: Some("application/octet-stream".into()),
        };
        assert_eq!(upload.declared_video_mime(), None);
    }

    #[test]
    fn data_url_prefix_is_split_off() {
        let upload = Upload::from_base64_text("data:video/webm;base64,AAEC\n", None).unwrap();
        assert_eq!(
            upload,
            Upload::Base64 {
                data: "AAEC".into(),
                mime_type: Some("video/webm".into()),
            }
        );
        assert_eq!(upload.size_bytes().unwrap(), 3);

        let overridden =
            Upload::from_base64_text("data:video/webm;base64,AAEC", Some("video/quicktime".into()))
                .unwrap();
        assert_eq!(overridden.declared_video_mime(), Some("video/quicktime"));
    }

    #[test]
    fn non_video_override_keeps_data_url_mime() {
        let upload = Upload::from_base64_text(
            "data:video/webm;base64,AAEC",
            Some("application/octet-stream".into()),
        )
        .unwrap();
        assert_eq!(upload.declared_video_mime(), Some("video/webm"));

        let bare = Upload::from_base64_text("AAEC", Some("application/octet-stream".into())).unwrap();
        assert_eq!(bare.declared_video_mime(), None);
    }

    #[test]
    fn long_base64_is_measured_across_steps() {
        let video = vec![0xABu8; 10_000];
        let upload = Upload::Base64 {
            data: STANDARD.encode(&video),
            mime_type: None,
        };
        assert_eq!(upload.size_bytes().unwrap(), 10_000);

        // 3070 bytes encode to exactly one step ending in "==".
        let mut data = STANDARD.encode(vec![1u8; 3070]);
        assert_eq!(data.len(), DECODE_CHUNK);
        assert!(STANDARD.decode(format!("{data}AAAA")).is_err());
        data.push_str("AAAA");
        let upload = Upload::Base64 { data, mime_type: None };
        assert!(upload.size_bytes().is_err());
    }

    #[test]
    fn blank_base64_is_no_upload() {
        assert!(Upload::from_base64_text("   ", None).is_none());
        assert!(Upload::from_base64_text("data:video/mp4;base64,", None).is_none());
    }

    #[test]
    fn invalid_base64_fails_size_check() {
        let upload = Upload::from_base64_text("not*base64", None).unwrap();
        assert!(upload.size_bytes().is_err());
    }

    #[test]
    fn file_uploads_are_encoded() {
        let upload = Upload::File {
            bytes: b"hello".to_vec(),
            filename: None,
            content_type: None,
        };
        assert_eq!(upload.size_bytes().unwrap(), 5);
        assert_eq!(upload.into_base64(), "aGVsbG8=");
    }

    #[test]
    fn base64_body_accepts_camel_case_mime() {
        let body: Base64Body =
            serde_json::from_value(json!({ "base64": "AA==", "mimeType": "video/webm" })).unwrap();
        assert_eq!(body.mime_type.as_deref(), Some("video/webm"));
    }
}
