use isahc::{Error as IError, http::StatusCode};
use serde_json::Error as JError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch: {0}")]
    Isahc(#[from] IError),
    #[error("Invalid request: {0}")]
    Http(#[from] isahc::http::Error),
    #[error("Malformed response body: {0}")]
    Json(#[from] JError),
    #[error("{}", .message.as_deref().unwrap_or("geolocation request failed"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    IOError(#[from] std::io::Error),
}

impl Error {
    pub fn api(status: StatusCode, message: Option<String>) -> Self {
        Self::Api { status, message }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Text shown on the error line. Empty when the server gave no reason.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone().unwrap_or_default(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::Isahc(_) => "http_client_error",
            Error::Http(_) => "http_request_error",
            Error::Json(_) => "malformed_body",
            Error::Api { .. } => "api_error",
            Error::Config(_) => "config_error",
            Error::IOError(_) => "io_error",
        }
    }
}
