use thiserror::Error;

/// The result type of counter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The errors that can occur while configuring a counter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("window size must be greater than 0, got {0}")]
    InvalidWindowSize(u32),
    #[error("window interval must be greater than 0 seconds, got {0}")]
    InvalidWindowInterval(u32),
    #[error("window capacity must be greater than 0, got {0}")]
    InvalidCapacity(usize),
    #[error("counter configuration is invalid, {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
