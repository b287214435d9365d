// Error types for hubgate.
// Covers transport, remote API, payload, configuration and cache failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("GitHub API transport error: {0}")]
    Transport(String),

    #[error("Response is too large: exceeds {limit} bytes")]
    ResponseTooLarge { limit: u64 },

    #[error("HTTP {status} from {url}")]
    RemoteStatus { url: String, status: u16 },

    #[error("Malformed payload from {url}: {source}")]
    MalformedPayload {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Team not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cache IO error: {0}")]
    CacheIo(#[from] std::io::Error),
}

impl GateError {
    /// Whether this error came from the fetch itself (as opposed to what was fetched).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            GateError::Transport(_)
                | GateError::ResponseTooLarge { .. }
                | GateError::RemoteStatus { .. }
        )
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        GateError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
