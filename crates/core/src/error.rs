use thiserror::Error;

/// Conditions that stop a search before it produces a result list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search cancelled")]
    Cancelled,
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug)]
pub enum ChainscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] chainscope_api::ApiError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

pub type Result<T> = std::result::Result<T, ChainscopeError>;
