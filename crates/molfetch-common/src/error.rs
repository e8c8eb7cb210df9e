use thiserror::Error;

#[derive(Debug, Error)]
pub enum MolfetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Security error: {0}")]
    Security(String),
}

pub type Result<T> = std::result::Result<T, MolfetchError>;
