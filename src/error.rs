use std::io;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error {0}")]
    Io(io::ErrorKind),

    #[error("Invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("User directory error: {0}")]
    Directory(String),

    #[error("Startup error: {0}")]
    Startup(String),

    #[error("JoinError: {0}")]
    JoinError(JoinError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<io::Error> for ForwarderError {
    fn from(err: io::Error) -> Self {
        ForwarderError::Io(err.kind())
    }
}

impl From<JoinError> for ForwarderError {
    fn from(err: JoinError) -> Self {
        ForwarderError::JoinError(err)
    }
}

impl From<config::ConfigError> for ForwarderError {
    fn from(err: config::ConfigError) -> Self {
        ForwarderError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForwarderError>;
