use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("platform error: {0}")]
    Platform(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// Exit status used when this error aborts the run. Authentication
    /// failures get a distinct code so callers can tell "refresh your
    /// token" apart from everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Auth(_) => 2,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
