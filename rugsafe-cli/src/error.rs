//! Error types for the rugsafe CLI

use rugsafe_base::VaultError;
use rugsafe_rpc_client::ClientError;
use thiserror::Error;

/// Main error type for the rugsafe CLI
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// RPC client errors
    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    /// Codec, derivation or builder errors
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cryptographic errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Generic error with context
    #[error("{message}")]
    Generic { message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid config format
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] serde_yaml::Error),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Unusable registry layout
    #[error("Invalid registry layout: {0}")]
    InvalidLayout(String),

    /// Unreadable Solana keypair file
    #[error("Invalid keypair file {path}: {message}")]
    InvalidKeypairFile { path: String, message: String },

    /// Directory creation failed
    #[error("Failed to create config directory: {0}")]
    DirectoryCreation(std::io::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Generic {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rugsafe_base::Pubkey;

    #[test]
    fn test_error_display() {
        let err: CliError = ConfigError::InvalidUrl("relative URL without a base".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid URL: relative URL without a base"
        );

        let err: CliError = ClientError::AccountNotFound(Pubkey::from_bytes(&[1u8; 32])).into();
        assert!(err.to_string().starts_with("RPC error: "));

        let err: CliError = VaultError::NoValidAddress.into();
        assert!(err.to_string().starts_with("Vault error: "));
    }
}
