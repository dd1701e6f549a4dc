use thiserror::Error;

/// Failures from the weather provider HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to weather provider failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("weather provider request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no API key configured; run `skycast configure` first")]
    MissingApiKey,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else {
            ClientError::Network(err)
        }
    }
}

/// Failures from the last-city store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read stored city: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write stored city: {0}")]
    Write(#[source] std::io::Error),

    #[error("stored city file is malformed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not determine platform data directory")]
    NoDataDir,
}
