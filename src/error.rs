/// Error types for license validation
use thiserror::Error;

/// Failure to produce an encrypted payload.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// The PEM text is not a usable RSA public key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Plaintext does not fit in a single OAEP block for this key.
    #[error("plaintext is {len} bytes but the key accepts at most {max}")]
    PlaintextTooLong { len: usize, max: usize },

    /// The RSA primitive rejected the operation.
    #[error("RSA encryption failed: {0}")]
    Rsa(#[from] rsa::Error),
}

/// Failure of a single `validate` call.
///
/// A well-formed response whose code is not a success code is NOT an
/// error; it comes back as a `ValidationResult` with `success == false`.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("failed to encrypt payload: {0}")]
    Encryption(#[from] EncryptionError),

    /// Connection refused, DNS failure, timeout, malformed URL, ...
    #[error("license server request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Body is not JSON or not a JSON object.
    #[error("failed to parse license server response: {0}")]
    ResponseParse(#[source] serde_json::Error),
}

/// Configuration errors raised by the host layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ValidationOutcome<T> = Result<T, ValidationError>;
