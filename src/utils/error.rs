use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response body is not valid UTF-8 text")]
    InvalidText,

    #[error("Unexpected response body: expected {expected}, got {found}")]
    UnexpectedResponse {
        expected: &'static str,
        found: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Http,
    Decode,
    Configuration,
    Io,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Transport(_) => ErrorCategory::Transport,
            ClientError::Status { .. } => ErrorCategory::Http,
            ClientError::Decode(_)
            | ClientError::InvalidText
            | ClientError::UnexpectedResponse { .. } => ErrorCategory::Decode,
            ClientError::Io(_) => ErrorCategory::Io,
            ClientError::Config { .. }
            | ClientError::InvalidConfigValue { .. }
            | ClientError::MissingConfig { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP 狀態碼（僅限伺服器已回應的錯誤）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Could not reach the server. Check the base URL and your network.".to_string()
            }
            ClientError::Status { status: 401, .. } | ClientError::Status { status: 403, .. } => {
                "The server rejected the session token. Log in again or pass --token.".to_string()
            }
            ClientError::Status { status, .. } => format!("The server answered with HTTP {}.", status),
            ClientError::Decode(_) | ClientError::InvalidText | ClientError::UnexpectedResponse { .. } => {
                "The server response could not be decoded.".to_string()
            }
            ClientError::Io(e) => format!("File operation failed: {}", e),
            ClientError::Config { .. }
            | ClientError::InvalidConfigValue { .. }
            | ClientError::MissingConfig { .. } => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
