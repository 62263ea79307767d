//! Error types for FantasyWear

use thiserror::Error;


pub type Result<T> = std::result::Result<T, FantasyWearError>;

#[derive(Error, Debug)]
pub enum FantasyWearError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request returned status {code}")]
    Status { code: u16 },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{env_var} environment variable not set")]
    MissingConfig { env_var: String },

    #[error("Malformed response: {message}")]
    Parse { message: String },

    #[error("Authorization lost: {message}")]
    AuthPermanent { message: String },

    #[error("Unable to obtain auth token: {message}")]
    AuthTransient { message: String },

    #[error("Wearable transport error: {message}")]
    Transport { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{}", missing_verifier_message(.callback_url))]
    MissingVerifier { callback_url: Option<String> },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("{operation} is not supported")]
    Unsupported { operation: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

fn missing_verifier_message(callback_url: &Option<String>) -> String {
    match callback_url {
        Some(url) => format!("Provided callback URL has no verifier: {url}"),
        None => "No OAuth verifier provided".to_string(),
    }
}

/// HTTP 4xx, inclusive on both ends.
pub fn is_client_error_status(code: u16) -> bool {
    (400..=499).contains(&code)
}

impl FantasyWearError {
    pub fn parse(message: impl Into<String>) -> Self {
        FantasyWearError::Parse {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        FantasyWearError::Transport {
            message: message.into(),
        }
    }

    /// The HTTP status attached to this error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FantasyWearError::Status { code } => Some(*code),
            FantasyWearError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server definitively rejected the request.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_some_and(is_client_error_status)
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, FantasyWearError::Cancelled)
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            FantasyWearError::Parse { .. } | FantasyWearError::Json(_) | FantasyWearError::Xml(_)
        )
    }

    /// Network, wearable transport, and local storage failures.
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            FantasyWearError::Http(_)
                | FantasyWearError::Status { .. }
                | FantasyWearError::Io(_)
                | FantasyWearError::Database(_)
                | FantasyWearError::Transport { .. }
                | FantasyWearError::Storage { .. }
        )
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            FantasyWearError::AuthPermanent { .. }
                | FantasyWearError::AuthTransient { .. }
                | FantasyWearError::MissingVerifier { .. }
                | FantasyWearError::PermissionDenied { .. }
        )
    }
}
