//! Data models and structures
//!
//! Defines the selectable text models, the request/response payloads of the
//! generation backend, and the client configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Text models offered by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextModel {
    #[default]
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "codellama")]
    CodeLlama,
    #[serde(rename = "gemma:2b")]
    Gemma,
}

impl TextModel {
    pub const ALL: [TextModel; 3] = [TextModel::Gemini, TextModel::CodeLlama, TextModel::Gemma];

    /// Token sent to the backend in the `model` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextModel::Gemini => "gemini",
            TextModel::CodeLlama => "codellama",
            TextModel::Gemma => "gemma:2b",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextModel::Gemini => "Gemini (gemini-1.5-flash-latest)",
            TextModel::CodeLlama => "Ollama: Code Llama",
            TextModel::Gemma => "Ollama: Gemma",
        }
    }
}

impl fmt::Display for TextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TextModel::ALL
            .into_iter()
            .find(|model| model.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidModel(s.to_string()))
    }
}

// Backend API request/response models
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub model: TextModel,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextGenerationResponse {
    pub result: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageGenerationResponse {
    /// Relative path such as `/generated_images/image.png`.
    pub image_path: String,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

// Configuration
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_KEY: &str = "my-super-secret-key";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub default_model: TextModel,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let first = |keys: &[&str]| keys.iter().find_map(|key| get(*key));

        let backend_url = first(&["BACKEND_URL", "NEXT_PUBLIC_BACKEND_URL"])
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let api_key = first(&["API_KEY", "NEXT_PUBLIC_API_KEY"])
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string());

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                Error::Config(format!("REQUEST_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let default_model = match get("DEFAULT_MODEL") {
            Some(raw) => raw.parse()?,
            None => TextModel::default(),
        };

        Ok(Self {
            backend_url: normalize_base_url(&backend_url),
            api_key,
            request_timeout,
            default_model,
        })
    }
}

/// Strips trailing slashes so `base + "/path"` never doubles them.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
