//! Error types for the xwt crate.

use thiserror::Error;

/// Errors that can occur during key and token operations.
#[derive(Debug, Error)]
pub enum XwtError {
    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// Input is shorter than the fixed-width header.
    #[error("truncated token: {len} bytes, need at least {min}")]
    TruncatedToken { len: usize, min: usize },

    /// Version field is not the supported literal.
    #[error("invalid token version: {0:?}")]
    InvalidVersion(String),

    /// Expires field is not a 10 digit decimal.
    #[error("malformed expiry: {0}")]
    MalformedExpiry(String),

    /// No signature of the algorithm's width is attached.
    #[error("token is not signed")]
    UnsignedToken,

    /// Signature check failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// Signature is valid but the token is past expiry plus grace period.
    #[error("token has expired at {expired_at}")]
    ExpiredToken { expired_at: String },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (reading config or key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
