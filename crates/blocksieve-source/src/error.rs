use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("blocklist provider error (status {status}): {message}")]
    Provider { status: String, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("blocklist source unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "http-fetch")]
    #[error("http error: {0}")]
    Http(reqwest::Error),
    #[cfg(feature = "http-fetch")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

// The request URL may carry credentials, so it is dropped from the error.
#[cfg(feature = "http-fetch")]
impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
