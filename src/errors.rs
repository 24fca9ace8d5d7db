use crate::config::FetchConfigError;
use crate::net::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Request failed: {0}")]
    Transport(#[source] TransportError),

    #[error("Failed to read response: {0}")]
    Stream(#[source] TransportError),

    #[error("Buffer has already been used")]
    BodyUsed,

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No tokio runtime available to buffer the response body")]
    NoRuntime,

    #[error("Invalid configuration: {0}")]
    Config(#[from] FetchConfigError),
}

impl FetchError {
    /// True when the error happened before or while talking to the network, as
    /// opposed to a misuse of the API or a body that failed to parse.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Stream(_))
    }
}
