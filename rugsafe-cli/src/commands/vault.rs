//! Vault command implementations

use serde_json::{Value, json};
use std::time::Duration;

use rugsafe_base::{KeyPair, Pubkey, Signature, Vault, VaultRegistry};
use rugsafe_rpc_client::{Client, VaultClient};

use crate::cli::SigningArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::utils::parse_pubkey;

/// Bind the configured vault program to a fresh RPC client
pub(crate) fn vault_client(config: &Config) -> Result<VaultClient<Client>, CliError> {
    let client = config.create_rpc_client()?;
    Ok(VaultClient::new(client, config.vault_program_pubkey()?)
        .with_layout(config.registry_layout()?))
}

/// Optionally wait for confirmation, then report the transaction
#[allow(clippy::too_many_arguments)]
pub(crate) async fn finish_transaction(
    config: &Config,
    vaults: &VaultClient<Client>,
    operation: &str,
    signer: &KeyPair,
    signature: Signature,
    confirm: bool,
    details: Value,
    json_format: bool,
) -> Result<(), CliError> {
    let status = if confirm {
        vaults
            .confirm_signature(&signature, Duration::from_secs(config.timeout_seconds))
            .await?;
        "confirmed"
    } else {
        "submitted"
    };

    let response = output::create_transaction_response(
        operation,
        &signer.pubkey().to_string(),
        &signature.to_string(),
        status,
        details,
    );
    output::print_output(response, json_format);
    Ok(())
}

/// Pick a vault by registry index or by vault account address
pub fn select_vault(registry: &VaultRegistry, selector: &str) -> Result<Vault, CliError> {
    if let Ok(index) = selector.parse::<usize>() {
        return registry.get(index).copied().ok_or_else(|| {
            CliError::Validation(format!(
                "Vault index {} out of range; registry holds {} vaults",
                index,
                registry.count()
            ))
        });
    }

    let address = parse_pubkey(selector, "vault")?;
    registry.find_by_account(&address).copied().ok_or_else(|| {
        CliError::Validation(format!("Vault {} is not in the registry", address))
    })
}

/// Execute the list-vaults command
pub async fn list_vaults(config: &Config, json_format: bool) -> Result<(), CliError> {
    let vaults = vault_client(config)?;
    let registry_address = vaults.registry_address()?;
    let registry = vaults.list_vaults().await?;

    let response = output::create_vaults_response(&registry_address.to_string(), &registry);
    output::print_output(response, json_format);
    Ok(())
}

/// Execute the create-vault command
pub async fn create_vault(
    config: &Config,
    token_a_mint: &str,
    signing: &SigningArgs,
    json_format: bool,
) -> Result<(), CliError> {
    let token_a_mint: Pubkey = parse_pubkey(token_a_mint, "Token-A mint")?;
    let payer = config.signer(signing.signer.as_deref()).await?;
    let receipt_mint = KeyPair::generate("receipt-mint")
        .map_err(|e| CliError::Crypto(format!("Failed to generate receipt mint: {}", e)))?;

    let vaults = vault_client(config)?;
    let signature = vaults
        .create_vault(&payer, &token_a_mint, &receipt_mint)
        .await?;

    finish_transaction(
        config,
        &vaults,
        "create-vault",
        &payer,
        signature,
        signing.confirm,
        json!({
            "token_a_mint": token_a_mint.to_string(),
            "receipt_mint": receipt_mint.pubkey().to_string(),
        }),
        json_format,
    )
    .await
}

/// Execute the deposit command
pub async fn deposit(
    config: &Config,
    vault_selector: &str,
    amount: u64,
    signing: &SigningArgs,
    json_format: bool,
) -> Result<(), CliError> {
    let payer = config.signer(signing.signer.as_deref()).await?;
    let vaults = vault_client(config)?;

    let registry = vaults.list_vaults().await?;
    let vault = select_vault(&registry, vault_selector)?;
    tracing::debug!("Depositing {} into vault {}", amount, vault.vault_account);

    let signature = vaults.deposit(&payer, &vault, amount).await?;

    finish_transaction(
        config,
        &vaults,
        "deposit",
        &payer,
        signature,
        signing.confirm,
        json!({
            "vault": vault.vault_account.to_string(),
            "token_a_mint": vault.mint_token_a.to_string(),
            "amount": amount,
        }),
        json_format,
    )
    .await
}
