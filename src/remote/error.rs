use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteScoringError {
    /// The endpoint reported an application-level error.
    #[error("remote scoring failed: {message}")]
    Server { message: String },

    /// The body was not a scoring response.
    #[error("malformed scoring response: {reason}")]
    MalformedResponse { reason: String },

    /// Connection-level failure from the HTTP transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RemoteScoringError {
    /// Server-reported message, if this is an application-level error.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RemoteScoringError::Server { message } => Some(message),
            _ => None,
        }
    }
}
