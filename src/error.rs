//! Error types for mdslabs.

/// Errors that can occur while configuring or driving the chunking engine.
///
/// Malformed Markdown is never an error: the engine degrades to a simpler
/// strategy instead. These variants only cover caller contract violations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input was not valid UTF-8 text.
    #[error("input is not valid text: {0}")]
    InvalidInput(#[from] std::str::Utf8Error),

    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// A strategy tag that does not name any known strategy.
    #[error("unknown chunking strategy: {0:?}")]
    UnknownStrategy(String),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for mdslabs operations.
pub type Result<T> = std::result::Result<T, Error>;
