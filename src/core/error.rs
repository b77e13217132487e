use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Review item already registered for message {0}")]
    DuplicateReview(i32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SuggestError>;
