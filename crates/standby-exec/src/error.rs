use thiserror::Error;

/// Script download failures. A single failed attempt fails the whole task,
/// there are no retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("payload encode failed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("wait failed: {0}")]
    Wait(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExecResult<T> = Result<T, ExecError>;
