use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Number of comments to display must be between 0 and 100")]
    InvalidRange,
    #[error("Failed to load comments (HTTP {status})")]
    CommentsUnavailable { status: u16 },
    #[error("{path} returned an error: {source}")]
    Status {
        path: String,
        #[source]
        source: ApiError,
    },
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url '{raw}': {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("page element #{0} is missing")]
    MissingElement(String),
    #[error("Number of comments to display must be a whole number between 0 and 100 (got {0:?})")]
    InvalidLimitInput(String),
    #[error("nickname must not be empty")]
    EmptyNickname,
}
