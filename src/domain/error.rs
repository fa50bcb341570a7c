//! Domain error types

use thiserror::Error;

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when converting between raw clipboard images and data URIs
#[derive(Debug, Clone, Error)]
pub enum DataUriError {
    #[error("Not a base64 data URI")]
    Malformed,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("Pixel buffer of {actual} bytes does not match {width}x{height} RGBA image")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),
}
