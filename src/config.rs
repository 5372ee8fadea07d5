//! Process configuration for the relay server.
//!
//! Settings are read once at startup (after `.env` is loaded) and shared read-only
//! with every handler through [`crate::AppState`]. Tests build [`Settings`] directly
//! or through [`Settings::from_vars`] with an in-memory lookup.

use std::{fmt, str::FromStr, time::Duration};

use serde::Serialize;
use thiserror::Error;

/// Default instruction sent alongside the inline video part.
pub const DEFAULT_PROMPT: &str =
    "Analyze this video and detect if it's real or deepfake. Respond with JSON only.";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MIME_TYPE: &str = "video/mp4";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which behavior `POST /api/analyze` has in this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzeMode {
    /// Relay the upload to the inference API and pass its response through.
    #[default]
    Forward,
    /// Fabricate a score locally without any outbound call.
    Simulate,
}

impl FromStr for AnalyzeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "forwarding" | "gemini" => Ok(Self::Forward),
            "simulate" | "simulated" | "mock" => Ok(Self::Simulate),
            other => Err(format!("unknown mode `{other}` (expected `forward` or `simulate`)")),
        }
    }
}

impl fmt::Display for AnalyzeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Simulate => f.write_str("simulate"),
        }
    }
}

/// Read-only server configuration.
#[derive(Clone)]
pub struct Settings {
    /// Bind address
    pub host: String,
    /// Listening port
    pub port: u16,
    /// Forward or simulate
    pub mode: AnalyzeMode,
    /// Gemini API key, required only in forwarding mode
    pub gemini_api_key: Option<String>,
    /// Base URL of the inference API, without a trailing slash
    pub gemini_api_base: String,
    /// Model name used in the `generateContent` path
    pub gemini_model: String,
    /// Upper bound on a single outbound call
    pub gemini_timeout: Duration,
    /// Text instruction sent with every video
    pub prompt: String,
    /// Ceiling on the request body held in memory
    pub max_upload_bytes: usize,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mode", &self.mode)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("gemini_api_base", &self.gemini_api_base)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_timeout", &self.gemini_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            mode: AnalyzeMode::default(),
            gemini_api_key: None,
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_timeout: DEFAULT_TIMEOUT,
            prompt: DEFAULT_PROMPT.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `PORT`, `HOST`
    /// - `ANALYZE_MODE`: `forward` (default) or `simulate`
    /// - `GEMINI_API_KEY`: required at request time in forwarding mode
    /// - `GEMINI_API_BASE`, `GEMINI_MODEL`, `GEMINI_TIMEOUT` (e.g. `90s`)
    /// - `ANALYZE_PROMPT`, `MAX_UPLOAD_BYTES`
    ///
    /// A missing API key is not a startup error; the analyze endpoint reports it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let mode = match var("ANALYZE_MODE") {
            Some(raw) => raw
                .parse::<AnalyzeMode>()
                .map_err(|reason| ConfigError::Invalid {
                    name: "ANALYZE_MODE",
                    reason,
                })?,
            None => defaults.mode,
        };

        let gemini_timeout = match var("GEMINI_TIMEOUT") {
            Some(raw) => humantime::parse_duration(&raw).map_err(|e| ConfigError::Invalid {
                name: "GEMINI_TIMEOUT",
                reason: e.to_string(),
            })?,
            None => defaults.gemini_timeout,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                reason: e.to_string(),
            })?,
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            mode,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_api_base: var("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_api_base),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_timeout,
            prompt: var("ANALYZE_PROMPT").unwrap_or(defaults.prompt),
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.mode, AnalyzeMode::Forward);
        assert!(settings.gemini_api_key.is_none());
        assert_eq!(settings.gemini_model, "gemini-2.0-flash");
        assert_eq!(settings.gemini_timeout, Duration::from_secs(120));
        assert_eq!(settings.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn reads_overrides() {
        let settings = settings_from(&[
            ("PORT", "8088"),
            ("ANALYZE_MODE", "Simulate"),
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_API_BASE", "http://127.0.0.1:9000/"),
            ("GEMINI_TIMEOUT", "1m 30s"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();

        assert_eq!(settings.port, 8088);
        assert_eq!(settings.mode, AnalyzeMode::Simulate);
        assert_eq!(settings.gemini_api_key.as_deref(), Some("abc"));
        assert_eq!(settings.gemini_api_base, "http://127.0.0.1:9000");
        assert_eq!(settings.gemini_timeout, Duration::from_secs(90));
        assert_eq!(settings.max_upload_bytes, 1024);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let settings = settings_from(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert!(settings.gemini_api_key.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            settings_from(&[("PORT", "not-a-port")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            settings_from(&[("ANALYZE_MODE", "maybe")]),
            Err(ConfigError::Invalid { name: "ANALYZE_MODE", .. })
        ));
        assert!(matches!(
            settings_from(&[("GEMINI_TIMEOUT", "soon")]),
            Err(ConfigError::Invalid { name: "GEMINI_TIMEOUT", .. })
        ));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let settings = settings_from(&[("GEMINI_API_KEY", "super-secret")]).unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
