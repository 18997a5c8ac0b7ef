use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    #[error("Fetch timed out")]
    FetchTimeout,

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("No content found")]
    NoContentFound,

    #[error("Keyword extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No keywords found")]
    NoKeywordsFound,

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Coarse classification of an [`Error`], one per pipeline failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    DomainNotAllowed,
    FetchTimeout,
    FetchFailed,
    NoContentFound,
    ExtractionFailed,
    NoKeywordsFound,
    GenerationFailed,
    PersistenceFailed,
    Unexpected,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::DomainNotAllowed(_) => ErrorKind::DomainNotAllowed,
            Error::FetchTimeout => ErrorKind::FetchTimeout,
            Error::FetchFailed(_) => ErrorKind::FetchFailed,
            Error::NoContentFound => ErrorKind::NoContentFound,
            Error::ExtractionFailed(_) => ErrorKind::ExtractionFailed,
            Error::NoKeywordsFound => ErrorKind::NoKeywordsFound,
            Error::GenerationFailed(_) => ErrorKind::GenerationFailed,
            Error::PersistenceFailed(_) => ErrorKind::PersistenceFailed,
            Error::Unexpected(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Http(_)
            | Error::External(_) => ErrorKind::Unexpected,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
