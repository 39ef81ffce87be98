//! Error types for the rugsafe RPC client
//!
//! Codec, derivation and builder failures from `rugsafe-base` pass through
//! unchanged inside [`ClientError::Vault`].

use rugsafe_base::{Pubkey, Signature, VaultError};
use std::time::Duration;
use thiserror::Error;

/// Main error type for the rugsafe RPC client
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP-specific errors
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Decoding, derivation or instruction building failed
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The ledger has no account at the given address
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Timeout errors
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The ledger executed the transaction and reported a failure
    #[error("Transaction {signature} failed: {message}")]
    TransactionFailed {
        /// Signature of the failed transaction
        signature: Signature,
        /// Error reported by the ledger
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Request failed with HTTP error
    #[error("HTTP request failed with status {status}: {message}")]
    RequestFailed {
        /// The HTTP status code
        status: u16,
        /// The error message from the server
        message: String,
    },

    /// JSON-RPC error response
    #[error("RPC error {code}: {message}")]
    RpcError {
        /// The JSON-RPC error code
        code: i32,
        /// The error message
        message: String,
        /// The error data
        data: Option<serde_json::Value>,
    },

    /// Request building or sending failed
    #[error("Failed to send request")]
    RequestBuilder(#[from] reqwest::Error),

    /// Response body could not be read
    #[error("Failed to read response")]
    ResponseParsing {
        /// The source error
        #[source]
        source: reqwest::Error,
    },

    /// Invalid endpoint URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl HttpError {
    /// Create an RPC error from a JSON-RPC error response
    pub fn from_rpc_error(code: i32, message: String, data: Option<serde_json::Value>) -> Self {
        Self::RpcError {
            code,
            message,
            data,
        }
    }
}

/// Validation errors for input data
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid public key format
    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    /// Invalid signature format
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid block hash format
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Invalid transaction data
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Serialization/deserialization errors
#[derive(Error, Debug)]
pub enum SerializationError {
    /// JSON serialization failed
    #[error("Failed to serialize to JSON")]
    JsonSerialize(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("Failed to deserialize from JSON")]
    JsonDeserialize {
        /// The source error
        #[source]
        source: serde_json::Error,
        /// The data that failed to deserialize
        data: String,
    },

    /// Base64 decoding failed
    #[error("Failed to decode base64: {0}")]
    Base64Decode(String),
}

/// Helper functions for common error patterns
impl ClientError {
    /// Create a timeout error
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout(duration)
    }

    /// Check if error is retryable
    ///
    /// Only transport-level failures qualify. Ledger rejections and local
    /// codec errors fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Http(HttpError::RequestFailed { status, .. }) => {
                *status == 429 || *status >= 500
            }
            Self::Http(HttpError::RequestBuilder(e)) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Get error code for JSON-RPC errors
    pub fn rpc_code(&self) -> Option<i32> {
        match self {
            Self::Http(HttpError::RpcError { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

impl From<rugsafe_base::ValidationError> for ValidationError {
    fn from(base_error: rugsafe_base::ValidationError) -> Self {
        match base_error {
            rugsafe_base::ValidationError::InvalidPubkey(s) => ValidationError::InvalidPubkey(s),
            rugsafe_base::ValidationError::InvalidSignature(s) => {
                ValidationError::InvalidSignature(s)
            }
            rugsafe_base::ValidationError::InvalidHash(s) => ValidationError::InvalidHash(s),
        }
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(error: anyhow::Error) -> Self {
        // Try to downcast to known error types first
        match error.downcast::<rugsafe_base::ValidationError>() {
            Ok(validation_error) => ClientError::Validation(validation_error.into()),
            Err(original_error) => {
                ClientError::Validation(ValidationError::InvalidConfig(original_error.to_string()))
            }
        }
    }
}
