use thiserror::Error;

use crate::cron::CronError;

/// Pastelens-wide error type.
///
/// Classification itself never fails; these errors surface from explicit
/// transform actions (inspection, profile loading) so the caller can show a
/// precise message.
#[derive(Error, Debug)]
pub enum PastelensError {
    /// Codec, cipher, profile or key-management failure
    #[error("Crypto error: {source}")]
    Crypto {
        #[from]
        source: pastelens_crypto::CryptoError,
    },

    /// I/O operations failed (profile file, stdin)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Cron expression could not be parsed or scheduled
    #[error("Cron error: {source}")]
    Cron {
        #[from]
        source: CronError,
    },

    /// Text is not an IP address or CIDR block
    #[error("Invalid address: {input}")]
    InvalidAddress {
        input: String,
    },

    /// Text is not a Unix timestamp or date-time literal
    #[error("Invalid timestamp: {input}")]
    InvalidTimestamp {
        input: String,
    },

    /// Text is not a parsable URL
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl {
        input:  String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },
}

impl From<pastelens_crypto::DecodeError> for PastelensError {
    fn from(source: pastelens_crypto::DecodeError) -> Self {
        Self::Crypto {
            source: source.into(),
        }
    }
}

/// Result type alias for Pastelens operations.
pub type Result<T> = std::result::Result<T, PastelensError>;
