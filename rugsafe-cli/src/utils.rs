//! Shared utility functions

use rugsafe_base::{KeyPair, Pubkey};

use crate::config::Config;
use crate::error::CliError;

/// Parse a base58 public key
pub fn parse_pubkey(input: &str, what: &str) -> Result<Pubkey, CliError> {
    Pubkey::new(input.to_string())
        .map_err(|e| CliError::Validation(format!("Invalid {} '{}': {}", what, input, e)))
}

/// Resolve account input to a public key
///
/// - `None` resolves to the signing key
/// - a value is tried as a base58 public key first, then as a key name from config
pub async fn resolve_account_input(
    input: Option<&str>,
    config: &Config,
) -> Result<Pubkey, CliError> {
    let Some(value) = input else {
        return Ok(config.signer(None).await?.pubkey());
    };

    if let Ok(pubkey) = Pubkey::new(value.to_string()) {
        return Ok(pubkey);
    }

    config
        .keys
        .keypair(value)
        .map(|keypair: KeyPair| keypair.pubkey())
        .map_err(|_| {
            CliError::Validation(format!(
                "Invalid input '{}': not a valid public key or key name. Available keys: {}",
                value,
                config.keys.list_keys().join(", ")
            ))
        })
}
