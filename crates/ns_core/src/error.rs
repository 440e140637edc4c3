use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("No articles survived processing: {0}")]
    EmptyResult(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Coarse failure class used when an error is downgraded to fallback data.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::NetworkFailure(_) | Error::Http(_) | Error::Synthesis(_) => FailureKind::NetworkFailure,
            Error::ParseFailure(_) | Error::Serialization(_) | Error::InvalidUrl(_) => FailureKind::ParseFailure,
            Error::ModelUnavailable(_) => FailureKind::ModelUnavailable,
            Error::EmptyResult(_) => FailureKind::EmptyResult,
            Error::InvalidInput(_) => FailureKind::InvalidInput,
            Error::Io(_) | Error::External(_) => FailureKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NetworkFailure,
    ParseFailure,
    ModelUnavailable,
    EmptyResult,
    InvalidInput,
    Internal,
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
