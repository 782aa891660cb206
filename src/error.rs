//! Error types for the Schnorr authentication protocol.

use thiserror::Error;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ZkpError>;

/// Errors raised by parameter validation, round sequencing and the driver.
///
/// A proof that fails to verify is not an error; `verify` reports it as `false`.
#[derive(Debug, Error)]
pub enum ZkpError {
    /// Modulus is not an odd prime
    #[error("invalid modulus: {0}")]
    InvalidModulus(String),

    /// Generator outside `[2, modulus - 2]` or of provably low order
    #[error("invalid generator: {0}")]
    InvalidGenerator(String),

    /// Challenge upper bound must be at least 1
    #[error("challenge upper bound must be at least 1")]
    InvalidChallengeBound,

    /// A round operation was called out of order
    #[error("cannot {operation} while round is {state}")]
    Sequence {
        operation: &'static str,
        state: &'static str,
    },

    /// Registration refused an empty password
    #[error("password must not be empty")]
    EmptyPassword,

    /// Console I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Tracing subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}
