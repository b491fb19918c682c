//! Error handling and custom error types
//!
//! Provides unified error handling across the client using thiserror.

use thiserror::Error;

/// Shown when the backend rejects a request without a `detail` field.
pub const GENERIC_API_ERROR: &str = "Ocorreu um erro desconhecido.";
pub const TIMEOUT_ERROR: &str = "O servidor demorou demais para responder.";
pub const CONNECT_ERROR: &str = "Não foi possível conectar ao servidor.";
pub const TRANSPORT_ERROR: &str = "Falha na comunicação com o servidor.";
pub const INVALID_RESPONSE_ERROR: &str = "Resposta inválida do servidor.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {}", .detail.as_deref().unwrap_or(GENERIC_API_ERROR))]
    Api { status: u16, detail: Option<String> },

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown model '{0}'")]
    InvalidModel(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    /// Text displayed to the user after the `Erro: ` prefix.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { detail, .. } => detail
                .as_deref()
                .filter(|detail| !detail.trim().is_empty())
                .unwrap_or(GENERIC_API_ERROR)
                .to_string(),
            Error::Http(e) if e.is_timeout() => TIMEOUT_ERROR.to_string(),
            Error::Http(e) if e.is_connect() => CONNECT_ERROR.to_string(),
            Error::Http(e) if e.is_decode() => INVALID_RESPONSE_ERROR.to_string(),
            Error::Http(_) => TRANSPORT_ERROR.to_string(),
            Error::Serialization(_) => INVALID_RESPONSE_ERROR.to_string(),
            Error::InvalidModel(model) => format!("Modelo desconhecido: '{}'", model),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
