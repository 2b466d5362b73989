use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Validation(String),
    #[error("a refresh is already running")]
    RefreshInProgress,
    #[error("no saved item is open")]
    NoDetailOpen,
}

impl ClientError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// The single line shown to the user for a failed action.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(err) if err.is_timeout() => {
                "Server did not respond in time; try again.".to_string()
            }
            Self::Transport(err) if err.is_connect() => {
                "Server unreachable; check the API address and network.".to_string()
            }
            Self::Transport(_) => "Network error while contacting the server.".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => "Server sent a response the client could not read.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
