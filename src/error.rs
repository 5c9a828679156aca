//! Error types for the inkbunny-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Precondition errors
    #[error("Not logged in")]
    NotLoggedIn,

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Response is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Artist not found: {0}")]
    AccountNotFound(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// How a failed attempt should be treated by [`crate::retry::with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Connection-level failure: wait the retry delay, then try again.
    Transient,
    /// The server answered, but not with what we asked for. Consumes an
    /// attempt without waiting.
    Protocol,
    /// Retrying cannot help.
    Fatal,
}

impl Error {
    /// Classify this error for the retry loop.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Error::Http(e) if e.is_decode() => RetryClass::Protocol,
            Error::Http(_) => RetryClass::Transient,
            Error::HttpStatus { .. }
            | Error::Json(_)
            | Error::Api(_)
            | Error::MissingField(_) => RetryClass::Protocol,
            _ => RetryClass::Fatal,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
