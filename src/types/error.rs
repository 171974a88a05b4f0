use thiserror::Error;

/// cabdash error types
#[derive(Error, Debug)]
pub enum CabdashError {
    /// Transport-level failure talking to the backend
    #[error("http error: {0}")]
    Http(String),

    /// Backend answered, but not with a usable payload
    #[error("api error: {0}")]
    Api(String),

    /// Failed to parse JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Month selector not in yyyy-MM form
    #[error("invalid month: {0}")]
    InvalidMonth(String),
}

/// Result type alias for cabdash
pub type Result<T> = std::result::Result<T, CabdashError>;
